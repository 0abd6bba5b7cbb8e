//! Project routes
//!
//! - GET    /projects            - All projects plus the user directory
//! - POST   /projects            - Create (requires an acting user)
//! - GET    /projects/{id}       - One project with resolved participants
//! - DELETE /projects/{id}       - Delete; succeeds even when absent
//! - POST   /projects/{id}/links - Append a link

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{required, resolve_actor, ApiRequest, Reply};
use crate::ids;
use crate::models::{Link, Priority, Project, PublicUser};
use crate::server::AppState;
use crate::types::{CrmError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddLinkRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
    pub users: Vec<(String, PublicUser)>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    pub project: Project,
    pub participants: Vec<PublicUser>,
}

const DEFAULT_LINK_EMOJI: &str = "🔗";

/// GET /projects
pub fn handle_list(state: &AppState) -> Result<Reply> {
    let mut projects = state.store.projects.list();
    projects.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    Reply::ok(&ProjectListResponse {
        projects,
        users: state.store.public_user_entries(),
    })
}

/// POST /projects
pub fn handle_create(state: &AppState, req: &ApiRequest) -> Result<Reply> {
    let created_by = resolve_actor(state, req)?;
    let body: CreateProjectRequest = req.json()?;
    let name = required(&body.name, "name")?;

    let project = Project {
        id: ids::new_id(ids::PROJECT),
        name: name.to_string(),
        description: body.description.unwrap_or_default(),
        cover: body.cover,
        priority: body.priority.unwrap_or_default(),
        due_date: body.due_date,
        value: body.value,
        participants: body.participants,
        comments: Vec::new(),
        links: Vec::new(),
        notes: body.notes,
        created_by,
        created_at: Utc::now(),
    };

    state.store.projects.insert(project.clone());
    info!("Created project {} by {}", project.id, project.created_by);

    Reply::ok(&project)
}

/// GET /projects/{id}
///
/// Participants that no longer resolve to a user are skipped.
pub fn handle_get(state: &AppState, id: &str) -> Result<Reply> {
    let project = state
        .store
        .projects
        .get(id)
        .ok_or_else(|| CrmError::NotFound("Project not found".into()))?;

    let participants = project
        .participants
        .iter()
        .filter_map(|user_id| state.store.users.get(user_id))
        .map(|user| PublicUser::from(&user))
        .collect();

    Reply::ok(&ProjectDetailResponse {
        project,
        participants,
    })
}

/// DELETE /projects/{id}
pub fn handle_delete(state: &AppState, id: &str) -> Result<Reply> {
    if state.store.projects.remove(id).is_some() {
        info!("Deleted project {}", id);
    }
    Ok(Reply::success())
}

/// POST /projects/{id}/links
pub fn handle_add_link(state: &AppState, id: &str, req: &ApiRequest) -> Result<Reply> {
    let body: AddLinkRequest = req.json()?;
    let link = Link {
        id: ids::new_id(ids::LINK),
        name: required(&body.name, "name")?.to_string(),
        url: required(&body.url, "url")?.to_string(),
        emoji: body
            .emoji
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_LINK_EMOJI.to_string()),
    };

    state
        .store
        .projects
        .update(id, |project| project.links.push(link.clone()))
        .ok_or_else(|| CrmError::NotFound("Project not found".into()))?;
    info!("Added link {} to project {}", link.id, id);

    Reply::ok(&link)
}
