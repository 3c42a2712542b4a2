use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::client::{Collection, DataClient, create_from};
use crate::models::{AuditAction, AuditLogRecord};
use crate::utils::new_record_id;

pub const AUTH_MODULE: &str = "auth";

/// Write-only audit side channel. Failures are logged and dropped.
#[derive(Clone)]
pub struct AuditLogger {
    client: Arc<dyn DataClient>,
    user_agent: String,
}

impl AuditLogger {
    pub fn new(client: Arc<dyn DataClient>, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }

    pub async fn record(&self, user_id: &str, action: AuditAction, details: Value) {
        let entry = AuditLogRecord {
            id: new_record_id("audit"),
            user_id: user_id.to_string(),
            action,
            module: AUTH_MODULE.to_string(),
            record_id: None,
            details: details.to_string(),
            ip_address: "unknown".to_string(),
            user_agent: self.user_agent.clone(),
            created_at: Utc::now(),
        };

        if let Err(e) = create_from(self.client.as_ref(), Collection::AuditLogs, &entry).await {
            tracing::error!("Failed to log audit event {}: {}", action.as_str(), e);
        }
    }
}
