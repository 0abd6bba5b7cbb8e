//! Health check endpoint
//!
//! /health, /healthz - Liveness probe with store counts. Does not seed.

use chrono::Utc;
use serde::Serialize;

use super::Reply;
use crate::server::AppState;
use crate::store::StoreStats;
use crate::types::Result;

#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
    pub timestamp: String,
    pub counts: StoreStats,
}

pub fn health_check(state: &AppState) -> Result<Reply> {
    Reply::ok(&HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now().to_rfc3339(),
        counts: state.store.stats(),
    })
}
