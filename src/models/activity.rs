//! Audit trail and user notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

/// Write-once record of a change made by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    /// Free-form tag, e.g. "create" or "delete"
    pub action: String,
    /// Entity type name, e.g. "project"
    pub entity: String,
    pub entity_id: String,
    pub user_id: String,
    pub changes: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Entity for AuditLog {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for Notification {
    fn id(&self) -> &str {
        &self.id
    }
}
