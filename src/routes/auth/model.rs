use serde::{Deserialize, Serialize};

use crate::models::{Permission, User};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Snapshot of the session as the shell header renders it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: Option<User>,
    pub full_name: Option<String>,
    pub initials: Option<String>,
    pub role_label: Option<&'static str>,
    pub permissions: Vec<Permission>,
    pub is_loading: bool,
}
