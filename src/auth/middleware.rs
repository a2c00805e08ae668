// Identity extractors for gateway routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::debug;

use crate::auth::{
    error::AuthError,
    models::{Identity, Role},
    token::TokenService,
};

/// Optional caller identity
///
/// `None` when the request carries no `Authorization` header; a header that
/// is present but malformed or expired is rejected. Anonymous callers can
/// still edit their draft, and operations that need an identity decide
/// themselves how to refuse.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

/// Caller identity that must carry the ADMIN role
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AuthError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?;

    Ok(Some(token))
}

fn resolve(parts: &Parts, tokens: &TokenService) -> Result<Option<Identity>, AuthError> {
    let Some(token) = bearer_token(parts)? else {
        return Ok(None);
    };

    let claims = tokens.validate(token)?;
    debug!("Resolved identity: user_id={}, role={}", claims.sub, claims.role);

    Ok(Some(Identity {
        user_id: claims.sub,
        role: claims.role,
        token: token.to_string(),
    }))
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeIdentity
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        resolve(parts, &tokens).map(MaybeIdentity)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminIdentity
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        let identity = resolve(parts, &tokens)?.ok_or(AuthError::MissingToken)?;

        if identity.role != Role::Admin {
            return Err(AuthError::InsufficientPermissions {
                required: Role::Admin,
                actual: identity.role,
            });
        }

        Ok(AdminIdentity(identity))
    }
}
