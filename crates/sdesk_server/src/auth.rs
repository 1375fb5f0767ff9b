use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::{unauthorized, ApiError};

/// Resolved caller identity for audit logging on protected routes.
///
/// Credential validation happens upstream (gateway-issued bearer tokens); this
/// layer only requires that a non-empty bearer credential is present and picks
/// up the identity the gateway resolved into `x-authenticated-user`. The
/// identity is threaded into lifecycle calls as the actor and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = authorization
            .strip_prefix("Bearer ")
            .or_else(|| authorization.strip_prefix("bearer "))
            .map(str::trim)
            .ok_or_else(|| unauthorized("Authorization header is not a bearer credential"))?;
        if token.is_empty() {
            return Err(unauthorized("Empty bearer credential"));
        }

        let identity = parts
            .headers
            .get("x-authenticated-user")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("bearer");

        Ok(CallerIdentity(identity.to_string()))
    }
}
