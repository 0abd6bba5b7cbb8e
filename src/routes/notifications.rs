//! Notification routes
//!
//! - GET    /notifications[?userId=] - Newest first
//! - POST   /notifications           - Create (unread)
//! - POST   /notifications/{id}/read - Mark read
//! - DELETE /notifications/{id}      - Dismiss; succeeds even when absent

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{required, ApiRequest, Reply};
use crate::ids;
use crate::models::Notification;
use crate::server::AppState;
use crate::types::{CrmError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
}

/// GET /notifications
pub fn handle_list(state: &AppState, req: &ApiRequest) -> Result<Reply> {
    let user_id = req.query_param("userId");

    let mut notifications: Vec<Notification> = state
        .store
        .notifications
        .list()
        .into_iter()
        .filter(|n| user_id.as_ref().map_or(true, |uid| &n.user_id == uid))
        .collect();
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

    Reply::ok(&NotificationListResponse { notifications })
}

/// POST /notifications
pub fn handle_create(state: &AppState, req: &ApiRequest) -> Result<Reply> {
    let body: CreateNotificationRequest = req.json()?;

    let notification = Notification {
        id: ids::new_id(ids::NOTIFICATION),
        user_id: required(&body.user_id, "userId")?.to_string(),
        title: required(&body.title, "title")?.to_string(),
        message: required(&body.message, "message")?.to_string(),
        task_id: body.task_id.filter(|t| !t.is_empty()),
        read: false,
        created_at: Utc::now(),
    };

    state.store.notifications.insert(notification.clone());
    info!("Notification {} for user {}", notification.id, notification.user_id);

    Reply::ok(&notification)
}

/// POST /notifications/{id}/read
pub fn handle_mark_read(state: &AppState, id: &str) -> Result<Reply> {
    let notification = state
        .store
        .notifications
        .update(id, |n| {
            n.read = true;
            n.clone()
        })
        .ok_or_else(|| CrmError::NotFound("Notification not found".into()))?;

    Reply::ok(&notification)
}

/// DELETE /notifications/{id}
pub fn handle_dismiss(state: &AppState, id: &str) -> Result<Reply> {
    if state.store.notifications.remove(id).is_some() {
        debug!("Dismissed notification {}", id);
    }
    Ok(Reply::success())
}
