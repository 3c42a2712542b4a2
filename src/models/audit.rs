use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actions the auth core records in `auditLogs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Login,
    Logout,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
        }
    }
}

/// A row of the `auditLogs` collection. Nothing in this crate reads these back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogRecord {
    pub id: String,
    pub user_id: String,
    pub action: AuditAction,
    pub module: String,
    pub record_id: Option<String>,
    /// JSON-encoded context.
    pub details: String,
    pub ip_address: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}
