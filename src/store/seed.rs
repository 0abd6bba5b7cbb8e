//! Demo data
//!
//! Seeding runs at most once per store: any existing user suppresses it.

use chrono::Utc;
use tracing::info;

use super::Store;
use crate::auth::hash_password;
use crate::models::{CardRadius, Font, Priority, Project, Theme, User};
use crate::types::{CrmError, Result};

pub const DEMO_PASSWORD: &str = "password123";

struct DemoUser {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    bio: &'static str,
}

const DEMO_USERS: [DemoUser; 2] = [
    DemoUser {
        id: "user-1",
        name: "Ana Silva",
        email: "ana@example.com",
        bio: "Product Manager",
    },
    DemoUser {
        id: "user-2",
        name: "João Costa",
        email: "joao@example.com",
        bio: "Designer",
    },
];

impl Store {
    /// Populate an empty store with two users and one project.
    ///
    /// Returns whether anything was inserted. Concurrent callers wait until
    /// the seeding caller has inserted every record.
    pub fn seed(&self) -> Result<bool> {
        let _guard = self
            .seed_lock
            .lock()
            .map_err(|_| CrmError::Internal("Seed lock poisoned".into()))?;

        if !self.users.is_empty() {
            return Ok(false);
        }

        for demo in &DEMO_USERS {
            let seed_name = demo.name.split(' ').next().unwrap_or(demo.name);
            self.users.insert(User {
                id: demo.id.to_string(),
                name: demo.name.to_string(),
                email: demo.email.to_string(),
                password: hash_password(DEMO_PASSWORD)?,
                avatar: Some(User::avatar_for(&ascii_seed(seed_name))),
                bio: Some(demo.bio.to_string()),
                theme: Theme::Light,
                font: Font::Geist,
                card_radius: CardRadius::Rounded,
            });
        }

        self.projects.insert(Project {
            id: "proj-1".into(),
            name: "Website Redesign".into(),
            description: "Complete redesign of company website with new branding".into(),
            cover: None,
            priority: Priority::High,
            due_date: Some("2025-02-15".into()),
            value: Some(5000.0),
            participants: DEMO_USERS.iter().map(|u| u.id.to_string()).collect(),
            comments: Vec::new(),
            links: Vec::new(),
            notes: None,
            created_by: DEMO_USERS[0].id.to_string(),
            created_at: Utc::now(),
        });

        info!(
            "Seeded demo data: {} users, {} projects",
            self.users.len(),
            self.projects.len()
        );
        Ok(true)
    }
}

/// "João" → "Joao" for avatar seeds
fn ascii_seed(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;

    #[test]
    fn test_seed_is_idempotent() {
        let store = Store::new();

        assert!(store.seed().unwrap());
        assert!(!store.seed().unwrap());
        assert!(!store.seed().unwrap());

        assert_eq!(store.users.len(), 2);
        assert_eq!(store.projects.len(), 1);
    }

    #[test]
    fn test_concurrent_seed_runs_once() {
        let store = Store::new();

        let seeded: Vec<bool> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| store.seed().unwrap())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(seeded.iter().filter(|&&inserted| inserted).count(), 1);
        assert_eq!(store.users.len(), 2);
        assert_eq!(store.projects.len(), 1);
    }

    #[test]
    fn test_seed_skips_when_any_user_exists() {
        let store = Store::new();
        store.seed().unwrap();
        store.projects.remove("proj-1");

        assert!(!store.seed().unwrap());
        assert!(store.projects.is_empty());
    }

    #[test]
    fn test_seed_contents() {
        let store = Store::new();
        store.seed().unwrap();

        let ana = store.find_user_by_email("ana@example.com").unwrap();
        assert_eq!(ana.id, "user-1");
        assert!(verify_password(DEMO_PASSWORD, &ana.password).unwrap());

        let joao = store.users.get("user-2").unwrap();
        assert_eq!(joao.name, "João Costa");
        assert_eq!(
            joao.avatar.as_deref(),
            Some("https://api.dicebear.com/7.x/avataaars/svg?seed=Joao")
        );

        let project = store.projects.get("proj-1").unwrap();
        assert_eq!(project.participants, vec!["user-1", "user-2"]);
        assert_eq!(project.priority, Priority::High);
        assert_eq!(project.value, Some(5000.0));
        assert_eq!(project.created_by, "user-1");
    }
}
