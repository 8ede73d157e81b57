//! Bearer API key authentication.
//!
//! Two extractors: [`Caller`] never rejects a request without credentials
//! and tells handlers whether private data may be shown; [`Authorized`]
//! rejects everything but a valid key. With no key configured every caller
//! is authorized (open mode).

use super::AppState;
use super::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use subtle::ConstantTimeEq;

const BEARER_PREFIX: &str = "Bearer ";

/// Who is calling. A wrong key is rejected; a missing one is anonymous.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub authorized: bool,
}

/// Marker extractor for routes that need a valid key.
#[derive(Debug, Clone, Copy)]
pub struct Authorized;

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
}

fn key_matches(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.api_key.as_deref() else {
            return Ok(Self { authorized: true });
        };

        match bearer_token(parts) {
            None => Ok(Self { authorized: false }),
            Some(token) if key_matches(expected, token) => Ok(Self { authorized: true }),
            Some(_) => {
                tracing::warn!(path = %parts.uri.path(), "rejected invalid API key");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

impl FromRequestParts<AppState> for Authorized {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_request_parts(parts, state).await?;
        if caller.authorized {
            Ok(Self)
        } else {
            tracing::warn!(path = %parts.uri.path(), "rejected request without API key");
            Err(ApiError::Unauthorized)
        }
    }
}
