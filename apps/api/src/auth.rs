//! Bearer-token authentication.
//!
//! The hosted auth service signs HS256 JWTs whose `sub` claim is the user's UUID.
//! The session subject is resolved once here, at the HTTP boundary, and handed to
//! orchestrators as a plain `Uuid`.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The auth subject, which doubles as the profile id.
    pub sub: Uuid,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Malformed Authorization header")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Verifies a token and returns its subject.
pub fn decode_subject(token: &str, config: &AuthConfig) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims.sub)
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MalformedHeader)
}

fn resolve_subject(parts: &Parts, config: &AuthConfig) -> Result<Uuid, AuthError> {
    let token = bearer_token(parts)?;
    decode_subject(token, config)
}

/// The authenticated user. Rejects with 401 when no valid token is present.
#[derive(Debug, Clone, Copy)]
pub struct Subject(pub Uuid);

/// The authenticated user, if any. Never rejects: a bad token reads as "signed out".
#[derive(Debug, Clone, Copy)]
pub struct MaybeSubject(pub Option<Uuid>);

#[async_trait]
impl FromRequestParts<AppState> for Subject {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_subject(parts, &state.config.auth)
            .map(Subject)
            .map_err(|e| {
                debug!("Rejecting request: {e}");
                AppError::Unauthorized
            })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeSubject {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_subject(parts, &state.config.auth) {
            Ok(subject) => Ok(MaybeSubject(Some(subject))),
            Err(e) => {
                debug!("No session subject: {e}");
                Ok(MaybeSubject(None))
            }
        }
    }
}
