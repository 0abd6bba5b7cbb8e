use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Priority};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Flip completion, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}

impl Entity for Task {
    fn id(&self) -> &str {
        &self.id
    }
}
