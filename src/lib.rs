//! Mesa - CRM API
//!
//! Projects, tasks, comments, links, notifications and audit logs served
//! as JSON over HTTP from an in-memory store.
//!
//! ## Layout
//!
//! - **Store**: id-keyed collections with idempotent demo seeding
//! - **Auth**: JWT issue/verify and Argon2 password hashing
//! - **Routes**: one handler per resource and verb
//! - **Server**: hyper accept loop and response rendering

pub mod auth;
pub mod config;
pub mod ids;
pub mod models;
pub mod routes;
pub mod server;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use store::Store;
pub use types::{CrmError, Result};
