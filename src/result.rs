use serde::{Deserialize, Serialize};

use crate::utils::error_codes;

/// JSON envelope returned by every shell endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 0 on success, one of `utils::error_codes` otherwise
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resp_data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "success".into(),
            resp_data: Some(data),
        }
    }

    pub fn error(code: i32, msg: &str) -> Self {
        Self {
            code,
            msg: msg.to_string(),
            resp_data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmptyResponse {}
