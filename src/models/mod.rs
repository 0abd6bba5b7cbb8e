//! Entity types held by the store
//!
//! Field names serialize in camelCase to match the JSON API.

pub mod activity;
pub mod project;
pub mod task;
pub mod user;

use serde::{Deserialize, Serialize};

pub use activity::{AuditLog, Notification};
pub use project::{Comment, Link, Project};
pub use task::Task;
pub use user::{CardRadius, Font, PublicUser, Theme, User};

/// Anything the store can key by identifier
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// Priority shared by projects and tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_wire_format() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
        assert_eq!(Priority::default(), Priority::Medium);
        assert!(serde_json::from_str::<Priority>("\"urgent\"").is_err());
    }
}
