//! Server components

pub mod http;

pub use http::{run, AppState};
