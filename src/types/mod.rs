//! Shared types for Mesa

pub mod error;

pub use error::{CrmError, Result};
