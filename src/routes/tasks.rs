//! Task routes
//!
//! - GET    /tasks[?projectId=]  - Tasks plus the user directory
//! - POST   /tasks               - Create
//! - POST   /tasks/{id}/toggle   - Flip completion
//! - DELETE /tasks/{id}          - Delete; succeeds even when absent

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{required, ApiRequest, Reply};
use crate::ids;
use crate::models::{Priority, PublicUser, Task};
use crate::server::AppState;
use crate::types::{CrmError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub users: Vec<(String, PublicUser)>,
}

/// GET /tasks
pub fn handle_list(state: &AppState, req: &ApiRequest) -> Result<Reply> {
    let project_id = req.query_param("projectId");

    let mut tasks: Vec<Task> = state
        .store
        .tasks
        .list()
        .into_iter()
        .filter(|task| match &project_id {
            Some(pid) => task.project_id.as_ref() == Some(pid),
            None => true,
        })
        .collect();
    tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    Reply::ok(&TaskListResponse {
        tasks,
        users: state.store.public_user_entries(),
    })
}

/// POST /tasks
pub fn handle_create(state: &AppState, req: &ApiRequest) -> Result<Reply> {
    let body: CreateTaskRequest = req.json()?;

    let task = Task {
        id: ids::new_id(ids::TASK),
        title: required(&body.title, "title")?.to_string(),
        description: body.description.unwrap_or_default(),
        priority: body.priority.unwrap_or_default(),
        assigned_to: body.assigned_to.filter(|a| !a.is_empty()),
        completed: false,
        due_date: body.due_date,
        project_id: body.project_id.filter(|p| !p.is_empty()),
        created_at: Utc::now(),
    };

    state.store.tasks.insert(task.clone());
    info!("Created task {}", task.id);

    Reply::ok(&task)
}

/// POST /tasks/{id}/toggle
pub fn handle_toggle(state: &AppState, id: &str) -> Result<Reply> {
    let task = state
        .store
        .tasks
        .update(id, |task| {
            task.toggle();
            task.clone()
        })
        .ok_or_else(|| CrmError::NotFound("Task not found".into()))?;
    info!("Task {} completed={}", task.id, task.completed);

    Reply::ok(&task)
}

/// DELETE /tasks/{id}
pub fn handle_delete(state: &AppState, id: &str) -> Result<Reply> {
    if state.store.tasks.remove(id).is_some() {
        info!("Deleted task {}", id);
    }
    Ok(Reply::success())
}
