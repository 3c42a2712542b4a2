use axum::{extract::OriginalUri, http::StatusCode, response::IntoResponse};

use crate::{error::AppError, navigation::route_for_path, utils::success_to_api_response};

/// Page descriptor for a shell route. Only reached once the guard allowed it.
#[axum::debug_handler]
pub async fn shell_page(OriginalUri(uri): OriginalUri) -> Result<impl IntoResponse, AppError> {
    let route = route_for_path(uri.path()).ok_or(AppError::NotFound)?;
    Ok((StatusCode::OK, success_to_api_response(*route)))
}
