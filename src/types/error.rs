//! Error types for Mesa
//!
//! Every handler returns `Result<_, CrmError>`; the dispatcher maps the
//! variant to a status code and renders `{ "error": ... }`.

use hyper::StatusCode;

/// Main error type for Mesa operations
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    #[error("{0}")]
    BadRequest(String),

    /// Unique-key collision (duplicate email). Surfaces as 400.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CrmError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the client.
    ///
    /// Server-side failures are opaque; their detail only goes to the log.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<std::io::Error> for CrmError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for CrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("Invalid JSON: {}", err))
    }
}

/// Result type alias for Mesa operations
pub type Result<T> = std::result::Result<T, CrmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(CrmError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(CrmError::Conflict("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(CrmError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(CrmError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(CrmError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            CrmError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_are_opaque() {
        let err = CrmError::Internal("hash exploded".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");

        let err = CrmError::Config("Token expiry out of range".into());
        assert_eq!(err.public_message(), "Internal server error");

        let err = CrmError::NotFound("Project not found".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Project not found");
    }

    #[test]
    fn test_json_errors_are_bad_requests() {
        let err: CrmError = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err().into();
        assert!(matches!(err, CrmError::BadRequest(_)));
    }
}
