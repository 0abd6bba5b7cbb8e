//! JWT token handling
//!
//! Tokens bind a user id and email, are signed with HS256 and expire after
//! seven days unless configured otherwise.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::types::CrmError;

/// Seven days
pub const DEFAULT_EXPIRY_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Fallback signing key used when `JWT_SECRET` is not configured
pub const DEFAULT_SECRET: &str = "crm-secret-key-change-in-production";

/// Payload stored in JWT token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// JWT validator and generator
#[derive(Clone)]
pub struct JwtValidator {
    secret: String,
    expiry_seconds: u64,
}

impl JwtValidator {
    /// Create a new JWT validator
    ///
    /// Returns an error if the secret is empty or too short
    pub fn new(secret: impl Into<String>, expiry_seconds: u64) -> Result<Self, CrmError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(CrmError::Config("JWT secret must not be empty".into()));
        }

        if secret.len() < 32 {
            return Err(CrmError::Config(
                "JWT secret must be at least 32 characters".into(),
            ));
        }

        Ok(Self {
            secret,
            expiry_seconds,
        })
    }

    /// Generate a token for an authenticated user
    pub fn generate_token(&self, user_id: &str, email: &str) -> Result<String, CrmError> {
        let now = unix_now()?;
        let exp = now
            .checked_add(self.expiry_seconds)
            .ok_or_else(|| CrmError::Config("Token expiry out of range".into()))?;

        let claims = Claims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            iat: now,
            exp,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| CrmError::Auth(format!("Failed to generate token: {}", e)))?;

        Ok(token)
    }

    /// Verify and decode a token
    ///
    /// Any failure (expired, malformed, wrong signature) yields `None`.
    pub fn verify_token(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(token_data) => Some(token_data.claims),
            Err(err) => {
                use jsonwebtoken::errors::ErrorKind;
                let reason = match err.kind() {
                    ErrorKind::ExpiredSignature => "token expired",
                    ErrorKind::InvalidToken => "invalid token",
                    ErrorKind::InvalidSignature => "invalid signature",
                    _ => "token validation failed",
                };
                debug!("Rejected token: {}", reason);
                None
            }
        }
    }
}

fn unix_now() -> Result<u64, CrmError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| CrmError::Internal(format!("System time error: {}", e)))
}

/// Extract token from Authorization header.
/// Supports "Bearer <token>" format and raw tokens.
pub fn extract_token_from_header(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?;

    if let Some(token) = header.strip_prefix("Bearer ") {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }

    if !header.contains(' ') {
        let token = header.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> JwtValidator {
        JwtValidator::new("test-secret-that-is-at-least-32-characters-long", 3600).unwrap()
    }

    #[test]
    fn test_generate_and_verify_token() {
        let validator = test_validator();

        let token = validator.generate_token("user-123", "zoe@x.com").unwrap();
        assert!(!token.is_empty());

        let claims = validator.verify_token(&token).unwrap();
        assert_eq!(claims.user_id, "user-123");
        assert_eq!(claims.email, "zoe@x.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_invalid_token() {
        assert!(test_validator().verify_token("invalid-token").is_none());
    }

    #[test]
    fn test_wrong_secret() {
        let other = JwtValidator::new("different-secret-that-is-at-least-32-characters", 3600)
            .unwrap();
        let token = test_validator().generate_token("user-123", "zoe@x.com").unwrap();

        assert!(other.verify_token(&token).is_none());
    }

    #[test]
    fn test_expired_token() {
        let validator = test_validator();
        // Past the default 60s leeway
        let claims = Claims {
            user_id: "user-123".into(),
            email: "zoe@x.com".into(),
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-that-is-at-least-32-characters-long"),
        )
        .unwrap();

        assert!(validator.verify_token(&token).is_none());
    }

    #[test]
    fn test_default_secret_uses_seven_day_expiry() {
        let validator = JwtValidator::new(DEFAULT_SECRET, DEFAULT_EXPIRY_SECONDS).unwrap();

        let token = validator.generate_token("user-1", "ana@example.com").unwrap();
        let claims = validator.verify_token(&token).unwrap();
        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.exp - claims.iat, 604_800);
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let validator =
            JwtValidator::new("test-secret-that-is-at-least-32-characters-long", u64::MAX).unwrap();

        assert!(matches!(
            validator.generate_token("user-1", "ana@example.com"),
            Err(CrmError::Config(_))
        ));
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header(Some("Bearer abc123")), Some("abc123"));
        assert_eq!(extract_token_from_header(Some("abc123")), Some("abc123"));

        assert_eq!(extract_token_from_header(None), None);
        assert_eq!(extract_token_from_header(Some("")), None);
        assert_eq!(extract_token_from_header(Some("Bearer ")), None);
        assert_eq!(extract_token_from_header(Some("Basic abc123")), None);
    }

    #[test]
    fn test_secret_validation() {
        assert!(JwtValidator::new("short", 3600).is_err());
        assert!(JwtValidator::new("", 3600).is_err());
        assert!(JwtValidator::new("this-secret-is-at-least-32-chars-long", 3600).is_ok());
    }
}
