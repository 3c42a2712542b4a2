use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the `userSessions` collection.
///
/// Rows are never swept; a row past `expires_at` is simply ignored when the
/// token is next restored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at
    }
}
