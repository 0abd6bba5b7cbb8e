//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling. Bodies are buffered
//! (bounded by `max_body_bytes`) before routing.

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, CACHE_CONTROL, CONTENT_TYPE,
};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::auth::JwtValidator;
use crate::config::Args;
use crate::routes::{self, ApiRequest, Reply};
use crate::store::Store;
use crate::types::{CrmError, Result};

const ALLOWED_METHODS: &str = "GET, POST, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-User-Id";

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub store: Arc<Store>,
    pub jwt: JwtValidator,
    pub started_at: Instant,
}

impl AppState {
    /// Create state with an empty store
    pub fn new(args: Args) -> Result<Self> {
        Self::with_store(args, Arc::new(Store::new()))
    }

    /// Create state around an existing store
    pub fn with_store(args: Args, store: Arc<Store>) -> Result<Self> {
        let jwt = JwtValidator::new(args.jwt_secret(), args.jwt_expiry_seconds)?;
        Ok(Self {
            args,
            store,
            jwt,
            started_at: Instant::now(),
        })
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("Mesa listening on {}", state.args.listen);

    if state.args.uses_default_secret() {
        warn!("JWT_SECRET not set - using the built-in signing key (not for production)");
    }

    if !state.args.no_seed {
        state.store.seed()?;
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Buffer the request and hand it to the router
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();

    info!("[{}] {} {}", addr, parts.method, parts.uri.path());

    if parts.method == Method::OPTIONS {
        return Ok(preflight_response());
    }

    let body = match read_body(body, state.args.max_body_bytes).await {
        Ok(body) => body,
        Err(err) => {
            warn!("[{}] {} {} rejected: {}", addr, parts.method, parts.uri.path(), err);
            return Ok(reply_response(Reply::error(&err)));
        }
    };

    let api_req = ApiRequest {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body,
    };

    let reply = routes::dispatch(&state, &api_req);
    debug!(
        "[{}] {} {} -> {} in {:?}",
        addr,
        api_req.method,
        api_req.path,
        reply.status,
        started.elapsed()
    );

    Ok(reply_response(reply))
}

/// Collect a request body, refusing anything over `limit` bytes
async fn read_body<B>(body: B, limit: usize) -> Result<Bytes>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(CrmError::BadRequest("Request body too large".into()))
        }
        Err(e) => Err(CrmError::BadRequest(format!("Failed to read body: {}", e))),
    }
}

/// Render a reply as a JSON response with CORS headers
pub fn reply_response(reply: Reply) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(reply.body.to_string())));
    *response.status_mut() = reply.status;

    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

/// CORS preflight response
fn preflight_response() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::NO_CONTENT;

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOWED_HEADERS));
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_response_headers() {
        let response = reply_response(Reply::error(&CrmError::NotFound("Project not found".into())));

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_reply_body_is_json() {
        let response = reply_response(Reply::success());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true }));
    }

    #[test]
    fn test_preflight() {
        let response = preflight_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let err = read_body(Full::new(Bytes::from(vec![b'x'; 100])), 10)
            .await
            .unwrap_err();
        let reply = Reply::error(&err);

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body, serde_json::json!({ "error": "Request body too large" }));
    }

    #[tokio::test]
    async fn test_body_within_limit() {
        let body = read_body(Full::new(Bytes::from_static(b"{\"a\":1}")), 7)
            .await
            .unwrap();
        assert_eq!(&body[..], b"{\"a\":1}");
    }

    #[test]
    fn test_state_rejects_short_secret() {
        let args = Args {
            jwt_secret: Some("too-short".into()),
            ..Args::default()
        };
        assert!(matches!(AppState::new(args), Err(CrmError::Config(_))));
    }
}
