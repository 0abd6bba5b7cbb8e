//! Configuration for Mesa
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;

use crate::auth::jwt::{DEFAULT_EXPIRY_SECONDS, DEFAULT_SECRET};

/// Mesa - CRM API over an in-memory store
#[derive(Parser, Debug, Clone)]
#[command(name = "mesa")]
#[command(about = "JSON API for projects, tasks, comments and notifications")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Secret for token signing (falls back to an insecure built-in default)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// Token lifetime in seconds
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value_t = DEFAULT_EXPIRY_SECONDS)]
    pub jwt_expiry_seconds: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Largest accepted request body in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value = "65536")]
    pub max_body_bytes: usize,

    /// Skip seeding demo data at startup (handlers still seed an empty store)
    #[arg(long, env = "NO_SEED", default_value = "false")]
    pub no_seed: bool,
}

impl Args {
    /// Effective signing secret
    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or(DEFAULT_SECRET)
    }

    /// Whether the built-in secret is in use
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret.is_none()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_expiry_seconds == 0 {
            return Err("JWT_EXPIRY_SECONDS must be greater than zero".to_string());
        }

        if self.max_body_bytes == 0 {
            return Err("MAX_BODY_BYTES must be greater than zero".to_string());
        }

        if self.jwt_secret().len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters".to_string());
        }

        Ok(())
    }
}

impl Default for Args {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            jwt_secret: None,
            jwt_expiry_seconds: DEFAULT_EXPIRY_SECONDS,
            log_level: "info".to_string(),
            max_body_bytes: 65536,
            no_seed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["mesa"]).unwrap();
        assert_eq!(args.listen.port(), 3000);
        assert_eq!(args.jwt_expiry_seconds, 604_800);
        assert_eq!(args.max_body_bytes, 65536);
        assert!(!args.no_seed);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "mesa",
            "--listen",
            "127.0.0.1:9000",
            "--jwt-secret",
            "a-production-secret-of-at-least-32-chars",
            "--jwt-expiry-seconds",
            "60",
            "--no-seed",
        ])
        .unwrap();

        assert_eq!(args.listen.port(), 9000);
        assert_eq!(args.jwt_secret(), "a-production-secret-of-at-least-32-chars");
        assert!(!args.uses_default_secret());
        assert_eq!(args.jwt_expiry_seconds, 60);
        assert!(args.no_seed);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_default_secret_fallback() {
        let args = Args::default();
        assert!(args.uses_default_secret());
        assert_eq!(args.jwt_secret(), DEFAULT_SECRET);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let args = Args {
            jwt_expiry_seconds: 0,
            ..Args::default()
        };
        assert!(args.validate().is_err());

        let args = Args {
            jwt_secret: Some("short".into()),
            ..Args::default()
        };
        assert!(args.validate().is_err());

        let args = Args {
            max_body_bytes: 0,
            ..Args::default()
        };
        assert!(args.validate().is_err());
    }
}
