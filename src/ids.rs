//! Identifier generation
//!
//! All entities share one scheme: a short type prefix followed by the
//! simple (hyphen-less) form of a random UUID v4.

use uuid::Uuid;

pub const USER: &str = "user";
pub const PROJECT: &str = "proj";
pub const TASK: &str = "task";
pub const COMMENT: &str = "comment";
pub const LINK: &str = "link";
pub const AUDIT: &str = "audit";
pub const NOTIFICATION: &str = "notif";

/// Generate a new identifier, e.g. `task-3f2c...` (32 hex chars after the prefix).
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_prefix_and_shape() {
        let id = new_id(TASK);
        let suffix = id.strip_prefix("task-").unwrap();
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ids_do_not_collide_in_a_tight_loop() {
        let ids: HashSet<String> = (0..10_000).map(|_| new_id(NOTIFICATION)).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
