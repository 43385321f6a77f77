//! Bearer-token identity and the extractors built on it.
//!
//! [`StaticIdentityVerifier`] checks tokens against a fixed table loaded at
//! startup. It does not talk to a hosted identity provider, so it issues no
//! tokens and knows nothing about expiry or revocation. `dev:` tokens let any
//! caller claim any uid and must stay off outside development and tests.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::http::AppState;

const MISSING_HEADER: &str = "Missing or invalid authorization header";
const INVALID_TOKEN: &str = "Invalid or expired token";
const DEV_TOKEN_PREFIX: &str = "dev:";

/// What the identity provider vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityClaim {
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Error)]
pub enum TokenFileError {
    #[error("Failed to read token file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("Invalid token file {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
    #[error("Token file {path} has an entry with an empty uid")]
    EmptyUid { path: String },
}

impl IdentityClaim {
    pub fn new(uid: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self { uid: uid.into(), email: email.into(), name: name.into() }
    }
}

/// Exchanges a bearer token for a claim.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Option<IdentityClaim>;
}

/// Token table filled at startup. With `accept_dev_tokens`, tokens shaped
/// `dev:<uid>[:<email>[:<name>]]` are accepted as well.
#[derive(Debug, Default)]
pub struct StaticIdentityVerifier {
    tokens: HashMap<String, IdentityClaim>,
    accept_dev_tokens: bool,
}

impl StaticIdentityVerifier {
    pub fn new(accept_dev_tokens: bool) -> Self {
        Self { tokens: HashMap::new(), accept_dev_tokens }
    }

    pub fn with_token(mut self, token: impl Into<String>, claim: IdentityClaim) -> Self {
        self.tokens.insert(token.into(), claim);
        self
    }

    /// Adds every entry of a JSON object mapping token to `{uid, email, name}`.
    pub fn with_token_file(mut self, path: impl AsRef<Path>) -> Result<Self, TokenFileError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| TokenFileError::Read { path: shown.clone(), source })?;
        let table: HashMap<String, IdentityClaim> =
            serde_json::from_str(&raw).map_err(|source| TokenFileError::Parse { path: shown.clone(), source })?;
        if table.values().any(|claim| claim.uid.is_empty()) {
            return Err(TokenFileError::EmptyUid { path: shown });
        }
        info!(path = %shown, tokens = table.len(), "Token table loaded");
        self.tokens.extend(table);
        Ok(self)
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    fn dev_claim(token: &str) -> Option<IdentityClaim> {
        let rest = token.strip_prefix(DEV_TOKEN_PREFIX)?;
        let mut parts = rest.splitn(3, ':');
        let uid = parts.next().filter(|uid| !uid.is_empty())?;
        let email = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        Some(IdentityClaim::new(uid, email, name))
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, token: &str) -> Option<IdentityClaim> {
        if let Some(claim) = self.tokens.get(token) {
            return Some(claim.clone());
        }
        if self.accept_dev_tokens {
            return Self::dev_claim(token);
        }
        None
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

async fn claim_from(parts: &Parts, state: &AppState) -> Result<IdentityClaim, ApiError> {
    let token = bearer_token(parts).ok_or_else(|| ApiError::Unauthorized(MISSING_HEADER.into()))?;
    match state.identity.verify(token).await {
        Some(claim) => Ok(claim),
        None => {
            debug!("Bearer token rejected");
            Err(ApiError::Unauthorized(INVALID_TOKEN.into()))
        }
    }
}

/// A caller with a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub IdentityClaim);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        claim_from(parts, state).await.map(AuthUser)
    }
}

/// Best-effort identity: absent or bad credentials yield `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<IdentityClaim>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(claim_from(parts, state).await.ok()))
    }
}

/// A verified caller whose user document carries the admin flag.
#[derive(Debug, Clone)]
pub struct AdminUser(pub IdentityClaim);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claim = claim_from(parts, state).await?;
        let user = state.users.find_user(claim.uid.clone()).await?;
        if !user.is_admin {
            return Err(ApiError::Forbidden("Admin access required".into()));
        }
        Ok(AdminUser(claim))
    }
}
