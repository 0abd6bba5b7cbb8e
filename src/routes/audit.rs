//! Audit log routes

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{required, ApiRequest, Reply};
use crate::ids;
use crate::models::AuditLog;
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuditLogRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub changes: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogListResponse {
    pub audit_logs: Vec<AuditLog>,
}

/// GET /audit-logs, newest first
pub fn handle_list(state: &AppState) -> Result<Reply> {
    let mut audit_logs = state.store.audit_logs.list();
    audit_logs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

    Reply::ok(&AuditLogListResponse { audit_logs })
}

/// POST /audit-logs
pub fn handle_create(state: &AppState, req: &ApiRequest) -> Result<Reply> {
    let body: CreateAuditLogRequest = req.json()?;

    let log = AuditLog {
        id: ids::new_id(ids::AUDIT),
        action: required(&body.action, "action")?.to_string(),
        entity: required(&body.entity, "entity")?.to_string(),
        entity_id: required(&body.entity_id, "entityId")?.to_string(),
        user_id: required(&body.user_id, "userId")?.to_string(),
        changes: body
            .changes
            .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
        created_at: Utc::now(),
    };

    state.store.audit_logs.insert(log.clone());
    info!("Audit {} {} {} by {}", log.action, log.entity, log.entity_id, log.user_id);

    Reply::ok(&log)
}
