//! In-memory entity store
//!
//! Five id-keyed collections, constructed explicitly and shared via `Arc`
//! in `AppState`. No transactions and no secondary indices; lookups by any
//! other field scan the whole collection.

pub mod seed;

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Mutex;

use crate::models::{AuditLog, Entity, Notification, Project, PublicUser, Task, User};

/// One id → entity mapping
pub struct Collection<T: Entity> {
    entries: DashMap<String, T>,
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Insert or replace by id, returning the previous value
    pub fn insert(&self, entity: T) -> Option<T> {
        self.entries.insert(entity.id().to_string(), entity)
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.entries.get(id).map(|entry| entry.value().clone())
    }

    /// Remove by id; absent ids are a no-op
    pub fn remove(&self, id: &str) -> Option<T> {
        self.entries.remove(id).map(|(_, entity)| entity)
    }

    /// Mutate one entity in place
    pub fn update<R>(&self, id: &str, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.entries.get_mut(id).map(|mut entry| f(entry.value_mut()))
    }

    /// Snapshot of every entity, in no particular order
    pub fn list(&self) -> Vec<T> {
        self.entries.iter().map(|entry| entry.value().clone()).collect()
    }

    /// First entity matching `predicate` (linear scan)
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.entries
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide CRM state
#[derive(Default)]
pub struct Store {
    pub users: Collection<User>,
    pub projects: Collection<Project>,
    pub tasks: Collection<Task>,
    pub audit_logs: Collection<AuditLog>,
    pub notifications: Collection<Notification>,
    /// Held while seeding so concurrent first requests seed once
    seed_lock: Mutex<()>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a user by login email (linear scan)
    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.users.find(|user| user.email == email)
    }

    /// All users as `(id, PublicUser)` pairs, ordered by id
    pub fn public_user_entries(&self) -> Vec<(String, PublicUser)> {
        let mut entries: Vec<_> = self
            .users
            .list()
            .iter()
            .map(|user| (user.id.clone(), PublicUser::from(user)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            users: self.users.len(),
            projects: self.projects.len(),
            tasks: self.tasks.len(),
            audit_logs: self.audit_logs.len(),
            notifications: self.notifications.len(),
        }
    }
}

/// Statistics about the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub users: usize,
    pub projects: usize,
    pub tasks: usize,
    pub audit_logs: usize,
    pub notifications: usize,
}
