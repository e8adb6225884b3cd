//! Authentication middleware for Axum
//!
//! `auth_middleware` verifies the bearer token, reloads the user it was
//! issued to and stores the resulting [`AuthenticatedUser`] in the request
//! extensions. Handlers then pick the principal up with the
//! [`AuthenticatedUser`] or [`AdminUser`] extractors.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::application::UserService;
use crate::domain::{DomainError, Role, User};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};
use crate::interfaces::http::common::ApiError;

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InsufficientPermissions,
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        let err = match error {
            AuthError::MissingToken => {
                DomainError::Unauthorized("Missing authentication token".into())
            }
            AuthError::InvalidToken => {
                DomainError::Unauthorized("Invalid authentication token".into())
            }
            AuthError::ExpiredToken => DomainError::Unauthorized("Token has expired".into()),
            AuthError::InsufficientPermissions => DomainError::Forbidden("Access denied".into()),
        };
        ApiError(err)
    }
}

/// Authentication state: the JWT config plus the user store used to
/// refresh the principal on every request.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub user_service: Arc<UserService>,
}

/// Principal behind a verified token, as currently stored
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    /// Effective role names
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            roles: user
                .effective_roles()
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r == role.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT bearer authentication middleware
///
/// Roles are taken from the stored user, not from the token, so a deleted
/// user is rejected and a changed role list applies immediately.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let user = match authenticate(&auth_state, request.headers()).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

async fn authenticate(
    auth_state: &AuthState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = extract_token(auth_header).ok_or(AuthError::InvalidToken)?;

    let claims = verify_token(token, &auth_state.jwt_config).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AuthError::InvalidToken
    })?;
    if claims.is_expired() {
        return Err(AuthError::ExpiredToken.into());
    }

    let user_id: i32 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
    let Some(user) = auth_state.user_service.find_principal(user_id).await? else {
        tracing::debug!(user_id, "Token subject no longer exists");
        return Err(AuthError::InvalidToken.into());
    };

    Ok(AuthenticatedUser::from_user(&user))
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}

/// Principal holding `ROLE_ADMIN`.
///
/// Placed first in a handler's argument list, so the check runs before the
/// path and body are extracted.
#[derive(Clone, Debug)]
pub struct AdminUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!(user_id = user.user_id, "Non-admin attempted a mutating operation");
            return Err(AuthError::InsufficientPermissions.into());
        }
        Ok(AdminUser(user))
    }
}
