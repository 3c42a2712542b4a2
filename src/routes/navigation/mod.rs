use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{AppState, error::AppError, utils::success_to_api_response};

/// Sidebar entries for the signed-in operator.
#[axum::debug_handler]
pub async fn navigation(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let Ok(session) = state.session.try_read() else {
        return Err(AppError::Loading);
    };
    if session.is_loading() {
        return Err(AppError::Loading);
    }
    if session.current_user().is_none() {
        return Err(AppError::Unauthorized);
    }

    let items: Vec<_> = crate::navigation::visible_items(&session)
        .into_iter()
        .copied()
        .collect();
    Ok((StatusCode::OK, success_to_api_response(items)))
}
