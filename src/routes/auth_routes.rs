//! HTTP Routes for Authentication
//!
//! - POST /auth/register - Create a user and get a token
//! - POST /auth/login    - Authenticate and get a token
//! - GET  /auth/me       - Get current user from token

use hyper::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{required, ApiRequest, Reply};
use crate::auth::{extract_token_from_header, hash_password, verify_password};
use crate::ids;
use crate::models::{CardRadius, Font, PublicUser, Theme, User};
use crate::server::AppState;
use crate::types::{CrmError, Result};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// POST /auth/register
///
/// Fails with 400 when the email is already registered; the existing record
/// is left as it was. Emails are trimmed, passwords are hashed as sent.
pub fn handle_register(state: &AppState, req: &ApiRequest) -> Result<Reply> {
    let body: RegisterRequest = req.json()?;
    let name = required(&body.name, "name")?;
    let email = required(&body.email, "email")?;
    required(&body.password, "password")?;
    let password = body.password.as_deref().unwrap_or_default();

    if state.store.find_user_by_email(email).is_some() {
        return Err(CrmError::Conflict("User already exists".into()));
    }

    let user = User {
        id: ids::new_id(ids::USER),
        name: name.to_string(),
        email: email.to_string(),
        password: hash_password(password)?,
        avatar: Some(User::avatar_for(name)),
        bio: Some(String::new()),
        theme: Theme::Light,
        font: Font::Geist,
        card_radius: CardRadius::Rounded,
    };

    let token = state.jwt.generate_token(&user.id, &user.email)?;
    state.store.users.insert(user.clone());
    info!("Registered user {} ({})", user.id, user.email);

    Reply::ok(&AuthResponse {
        token,
        user: PublicUser::from(&user),
    })
}

/// POST /auth/login
pub fn handle_login(state: &AppState, req: &ApiRequest) -> Result<Reply> {
    let body: LoginRequest = req.json()?;

    let email = body.email.trim();

    let candidate = state.store.find_user_by_email(email);
    let user = match candidate {
        Some(user) if verify_password(&body.password, &user.password)? => user,
        _ => {
            warn!("Failed login for {}", email);
            return Err(CrmError::Unauthorized("Invalid email or password".into()));
        }
    };

    let token = state.jwt.generate_token(&user.id, &user.email)?;
    info!("User {} logged in", user.id);

    Reply::ok(&AuthResponse {
        token,
        user: PublicUser::from(&user),
    })
}

/// GET /auth/me
pub fn handle_me(state: &AppState, req: &ApiRequest) -> Result<Reply> {
    let token = extract_token_from_header(req.header(AUTHORIZATION.as_str()))
        .ok_or_else(|| CrmError::Unauthorized("Missing authorization token".into()))?;
    let claims = state
        .jwt
        .verify_token(token)
        .ok_or_else(|| CrmError::Unauthorized("Invalid or expired token".into()))?;

    let user = state
        .store
        .users
        .get(&claims.user_id)
        .ok_or_else(|| CrmError::NotFound("User not found".into()))?;

    Reply::ok(&MeResponse {
        user: PublicUser::from(&user),
    })
}
