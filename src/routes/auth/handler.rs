use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    result::{ApiResponse, EmptyResponse},
    utils::{error_codes, success_to_api_response},
};

use super::model::{LoginRequest, MeResponse};

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let outcome = state
        .session
        .write()
        .await
        .login(&req.email, &req.password)
        .await;

    if outcome.success {
        return (StatusCode::OK, success_to_api_response(outcome));
    }

    let msg = outcome.error.clone().unwrap_or_default();
    (
        StatusCode::OK,
        Json(ApiResponse {
            code: error_codes::AUTH_FAILED,
            msg,
            resp_data: Some(outcome),
        }),
    )
}

#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    state.session.write().await.logout().await;
    (StatusCode::OK, success_to_api_response(EmptyResponse {}))
}

#[axum::debug_handler]
pub async fn me(State(state): State<AppState>) -> impl IntoResponse {
    // Do not queue behind a running restore or login.
    let body = match state.session.try_read() {
        Ok(session) => MeResponse {
            user: session.current_user().cloned(),
            full_name: session.current_user().map(|u| u.full_name()),
            initials: session.current_user().map(|u| u.initials()),
            role_label: session.current_user().map(|u| u.role.label()),
            permissions: session.permissions().to_permissions(),
            is_loading: session.is_loading(),
        },
        Err(_) => MeResponse {
            user: None,
            full_name: None,
            initials: None,
            role_label: None,
            permissions: Vec::new(),
            is_loading: true,
        },
    };
    (StatusCode::OK, success_to_api_response(body))
}
