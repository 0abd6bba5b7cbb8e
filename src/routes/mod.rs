//! HTTP routes for Mesa
//!
//! Every handler follows the same shape: seed the store, perform one or two
//! store operations, serialize a reply. Handlers work on a fully buffered
//! [`ApiRequest`] so they can be driven without a socket.

pub mod audit;
pub mod auth_routes;
pub mod comments;
pub mod health;
pub mod notifications;
pub mod projects;
pub mod tasks;

use bytes::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use hyper::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{error, warn};

use crate::auth::extract_token_from_header;
use crate::server::AppState;
use crate::types::{CrmError, Result};

/// Header accepted as the acting user when no bearer token is sent
pub const USER_ID_HEADER: &str = "x-user-id";

/// A buffered request
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiRequest {
    /// Build a request from a method and a path with optional query string
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (uri.to_string(), None),
        };

        Self {
            method,
            path,
            query,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_json(mut self, body: &serde_json::Value) -> Self {
        self.body = Bytes::from(body.to_string());
        self
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(HeaderName::from_static(name), value);
        }
        self
    }

    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("authorization", &format!("Bearer {}", token))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decode a query parameter; empty values count as absent
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        let params: HashMap<String, String> = serde_urlencoded::from_str(query).ok()?;
        params.get(name).filter(|v| !v.is_empty()).cloned()
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.is_empty() {
            return Err(CrmError::BadRequest("Request body required".into()));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// A handler result before it becomes an HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl Reply {
    /// 200 with a serialized body
    pub fn ok<T: Serialize>(body: &T) -> Result<Self> {
        let body = serde_json::to_value(body)
            .map_err(|e| CrmError::Internal(format!("Failed to serialize response: {}", e)))?;
        Ok(Self {
            status: StatusCode::OK,
            body,
        })
    }

    /// `{ "success": true }`
    pub fn success() -> Self {
        Self {
            status: StatusCode::OK,
            body: serde_json::json!({ "success": true }),
        }
    }

    /// `{ "error": ... }` with the mapped status
    pub fn error(err: &CrmError) -> Self {
        Self {
            status: err.status_code(),
            body: serde_json::json!({ "error": err.public_message() }),
        }
    }
}

/// Route a request to its handler and render any error
pub fn dispatch(state: &AppState, req: &ApiRequest) -> Reply {
    match route(state, req) {
        Ok(reply) => reply,
        Err(err) => {
            if err.status_code().is_server_error() {
                error!("{} {} failed: {}", req.method, req.path, err);
            } else {
                warn!("{} {} rejected: {}", req.method, req.path, err);
            }
            Reply::error(&err)
        }
    }
}

fn route(state: &AppState, req: &ApiRequest) -> Result<Reply> {
    let path = match req.path.strip_prefix("/api") {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => req.path.as_str(),
    };
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let method = &req.method;

    if matches!(segments.as_slice(), ["health"] | ["healthz"]) {
        if method != Method::GET {
            return Err(CrmError::MethodNotAllowed);
        }
        return health::health_check(state);
    }

    // Everything else works against seeded data
    state.store.seed()?;

    match (method, segments.as_slice()) {
        (&Method::POST, ["auth", "register"]) => auth_routes::handle_register(state, req),
        (&Method::POST, ["auth", "login"]) => auth_routes::handle_login(state, req),
        (&Method::GET, ["auth", "me"]) => auth_routes::handle_me(state, req),

        (&Method::GET, ["projects"]) => projects::handle_list(state),
        (&Method::POST, ["projects"]) => projects::handle_create(state, req),
        (&Method::GET, ["projects", id]) => projects::handle_get(state, id),
        (&Method::DELETE, ["projects", id]) => projects::handle_delete(state, id),
        (&Method::POST, ["projects", id, "links"]) => projects::handle_add_link(state, id, req),

        (&Method::GET, ["comments"]) => comments::handle_list(state, req),
        (&Method::POST, ["comments"]) => comments::handle_create(state, req),

        (&Method::GET, ["tasks"]) => tasks::handle_list(state, req),
        (&Method::POST, ["tasks"]) => tasks::handle_create(state, req),
        (&Method::POST, ["tasks", id, "toggle"]) => tasks::handle_toggle(state, id),
        (&Method::DELETE, ["tasks", id]) => tasks::handle_delete(state, id),

        (&Method::GET, ["audit-logs"]) => audit::handle_list(state),
        (&Method::POST, ["audit-logs"]) => audit::handle_create(state, req),

        (&Method::GET, ["notifications"]) => notifications::handle_list(state, req),
        (&Method::POST, ["notifications"]) => notifications::handle_create(state, req),
        (&Method::POST, ["notifications", id, "read"]) => {
            notifications::handle_mark_read(state, id)
        }
        (&Method::DELETE, ["notifications", id]) => notifications::handle_dismiss(state, id),

        // Known resource, wrong verb
        (_, ["auth", "register" | "login" | "me"])
        | (_, ["projects"])
        | (_, ["projects", _])
        | (_, ["projects", _, "links"])
        | (_, ["comments"])
        | (_, ["tasks"])
        | (_, ["tasks", _])
        | (_, ["tasks", _, "toggle"])
        | (_, ["audit-logs"])
        | (_, ["notifications"])
        | (_, ["notifications", _])
        | (_, ["notifications", _, "read"]) => Err(CrmError::MethodNotAllowed),

        _ => Err(CrmError::NotFound("Not found".into())),
    }
}

/// Reject a missing or blank string field
pub(crate) fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CrmError::BadRequest(format!(
            "Missing required field: {}",
            field
        ))),
    }
}

/// Resolve the acting user: a valid bearer token wins, then `x-user-id`.
pub(crate) fn resolve_actor(state: &AppState, req: &ApiRequest) -> Result<String> {
    if let Some(token) = extract_token_from_header(req.header(AUTHORIZATION.as_str())) {
        return state
            .jwt
            .verify_token(token)
            .map(|claims| claims.user_id)
            .ok_or_else(|| CrmError::Unauthorized("Invalid or expired token".into()));
    }

    match req.header(USER_ID_HEADER).map(str::trim) {
        Some(user_id) if !user_id.is_empty() => Ok(user_id.to_string()),
        _ => Err(CrmError::Unauthorized("Unauthorized".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Args;

    fn state() -> AppState {
        AppState::new(Args::default()).unwrap()
    }

    #[test]
    fn test_request_parsing() {
        let req = ApiRequest::new(Method::GET, "/api/comments?projectId=proj-1&empty=");
        assert_eq!(req.path, "/api/comments");
        assert_eq!(req.query_param("projectId").as_deref(), Some("proj-1"));
        assert_eq!(req.query_param("empty"), None);
        assert_eq!(req.query_param("missing"), None);
    }

    #[test]
    fn test_required() {
        assert_eq!(required(&Some(" Zoe ".into()), "name").unwrap(), "Zoe");
        assert!(required(&Some("  ".into()), "name").is_err());
        assert!(required(&None, "name").is_err());
    }

    #[test]
    fn test_resolve_actor() {
        let state = state();

        let req = ApiRequest::new(Method::POST, "/projects").with_header(USER_ID_HEADER, "user-2");
        assert_eq!(resolve_actor(&state, &req).unwrap(), "user-2");

        let token = state.jwt.generate_token("user-1", "ana@example.com").unwrap();
        let req = ApiRequest::new(Method::POST, "/projects")
            .with_bearer(&token)
            .with_header(USER_ID_HEADER, "user-2");
        assert_eq!(resolve_actor(&state, &req).unwrap(), "user-1");

        let req = ApiRequest::new(Method::POST, "/projects").with_bearer("garbage");
        assert!(matches!(resolve_actor(&state, &req), Err(CrmError::Unauthorized(_))));

        let req = ApiRequest::new(Method::POST, "/projects");
        assert!(matches!(resolve_actor(&state, &req), Err(CrmError::Unauthorized(_))));
    }

    #[test]
    fn test_unknown_route_and_wrong_verb() {
        let state = state();

        let reply = dispatch(&state, &ApiRequest::new(Method::GET, "/nowhere"));
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body["error"], "Not found");

        let reply = dispatch(&state, &ApiRequest::new(Method::PUT, "/tasks"));
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
