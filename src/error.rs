use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::models::Role;
use crate::result::ApiResponse;
use crate::utils::error_codes;

pub const ACCESS_DENIED_MESSAGE: &str = "You don't have permission to access this module. \
     Contact your administrator if you believe this is an error.";

#[derive(Debug)]
pub enum AppError {
    /// No authenticated user; the shell should navigate to the login view.
    Unauthorized,
    /// Authenticated, but the role lacks the module or verb.
    AccessDenied {
        module: String,
        permission: String,
        role: Role,
    },
    /// Session restore or an auth operation is still in flight.
    Loading,
    NotFound,
    Validation(String),
    InternalServerError,
}

/// Extra context carried in `resp_data` of an error envelope.
#[derive(Debug, Default, Serialize)]
struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
}

impl ErrorDetail {
    fn is_empty(&self) -> bool {
        self.redirect.is_none() && self.required.is_none() && self.role.is_none()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut detail = ErrorDetail::default();
        let (status, code, msg) = match self {
            AppError::Unauthorized => {
                detail.redirect = Some("/login");
                (
                    StatusCode::UNAUTHORIZED,
                    error_codes::AUTH_FAILED,
                    "Authentication required".to_string(),
                )
            }
            AppError::AccessDenied {
                module,
                permission,
                role,
            } => {
                detail.required = Some(format!("{} - {}", module, permission));
                detail.role = Some(role);
                (
                    StatusCode::FORBIDDEN,
                    error_codes::PERMISSION_DENIED,
                    ACCESS_DENIED_MESSAGE.to_string(),
                )
            }
            AppError::Loading => (
                StatusCode::SERVICE_UNAVAILABLE,
                error_codes::LOADING,
                "Loading...".to_string(),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                error_codes::NOT_FOUND,
                "Not found".to_string(),
            ),
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR, message)
            }
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = ApiResponse {
            code,
            msg,
            resp_data: (!detail.is_empty()).then_some(detail),
        };
        (status, Json(body)).into_response()
    }
}

impl From<crate::client::ClientError> for AppError {
    fn from(e: crate::client::ClientError) -> Self {
        match e {
            crate::client::ClientError::NotFound { .. } => AppError::NotFound,
            other => {
                tracing::error!("backend call failed: {}", other);
                AppError::InternalServerError
            }
        }
    }
}
