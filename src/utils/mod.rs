use axum::Json;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use uuid::Uuid;

use crate::result::ApiResponse;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

/// Opaque session token, `crm_<millis>_<uuid>`.
///
/// The random part is a v4 UUID drawn from the OS CSPRNG.
pub fn generate_session_token() -> String {
    format!(
        "crm_{}_{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

/// Caller-supplied record id, e.g. `session_3f2a...`.
pub fn new_record_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

pub fn success_to_api_response<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse::error(code, &msg))
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const USER_EXISTS: i32 = 1001;
    pub const AUTH_FAILED: i32 = 1002;
    pub const PERMISSION_DENIED: i32 = 1003;
    pub const NOT_FOUND: i32 = 1004;
    pub const LOADING: i32 = 1006;
    pub const INTERNAL_ERROR: i32 = 5000;
}
