use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    auth::{GuardDecision, check_route},
    error::AppError,
    navigation::route_for_path,
};

/// Route guard for shell pages.
///
/// Paths outside the shell route table pass through untouched.
pub async fn route_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(route) = route_for_path(request.uri().path()) else {
        return Ok(next.run(request).await);
    };

    // A held write lock means restore or login is in flight.
    let decision = match state.session.try_read() {
        Ok(session) => check_route(&session, route.module, route.permission),
        Err(_) => GuardDecision::Loading,
    };

    match decision {
        GuardDecision::Allow => Ok(next.run(request).await),
        GuardDecision::Loading => Err(AppError::Loading),
        GuardDecision::RedirectToLogin => Err(AppError::Unauthorized),
        GuardDecision::AccessDenied {
            module,
            permission,
            role,
        } => {
            tracing::warn!(
                "access denied to {}: {} requires {} - {}",
                role,
                route.path,
                module,
                permission
            );
            Err(AppError::AccessDenied {
                module,
                permission,
                role,
            })
        }
    }
}
