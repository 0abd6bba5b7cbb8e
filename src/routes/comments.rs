//! Comment routes
//!
//! Comments live inside their project; there is no comment collection.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{required, ApiRequest, Reply};
use crate::ids;
use crate::models::Comment;
use crate::server::AppState;
use crate::types::{CrmError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<Comment>,
}

/// GET /comments?projectId=
pub fn handle_list(state: &AppState, req: &ApiRequest) -> Result<Reply> {
    let project_id = req
        .query_param("projectId")
        .ok_or_else(|| CrmError::BadRequest("Project ID required".into()))?;

    let project = state
        .store
        .projects
        .get(&project_id)
        .ok_or_else(|| CrmError::NotFound("Project not found".into()))?;

    Reply::ok(&CommentListResponse {
        comments: project.comments,
    })
}

/// POST /comments
pub fn handle_create(state: &AppState, req: &ApiRequest) -> Result<Reply> {
    let body: CreateCommentRequest = req.json()?;
    let project_id = required(&body.project_id, "projectId")?;

    if !state.store.projects.contains(project_id) {
        return Err(CrmError::NotFound("Project not found".into()));
    }

    let comment = Comment {
        id: ids::new_id(ids::COMMENT),
        text: required(&body.text, "text")?.to_string(),
        user_id: required(&body.user_id, "userId")?.to_string(),
        project_id: project_id.to_string(),
        created_at: Utc::now(),
    };

    // The project may have been deleted since the check above
    state
        .store
        .projects
        .update(project_id, |project| project.comments.push(comment.clone()))
        .ok_or_else(|| CrmError::NotFound("Project not found".into()))?;
    info!("Added comment {} to project {}", comment.id, project_id);

    Reply::ok(&comment)
}
