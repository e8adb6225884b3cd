//! Numeric id path parameters
//!
//! An id that is not a valid `i32` cannot name a stored row, so it is
//! reported the same way as an unknown id: 409 with "<Entity> does not
//! exist!", instead of axum's plain-text 400.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::ApiError;
use crate::domain::DomainError;

/// `{id}` of a `/users/{id}` route
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub i32);

/// `{id}` of a `/groups/{id}` route
#[derive(Debug, Clone, Copy)]
pub struct GroupId(pub i32);

async fn parse_id<S>(parts: &mut Parts, state: &S, entity: &'static str) -> Result<i32, ApiError>
where
    S: Send + Sync,
{
    let Path(raw) = Path::<String>::from_request_parts(parts, state)
        .await
        .map_err(|rejection| {
            tracing::debug!(entity, error = %rejection.body_text(), "Undecodable id in path");
            ApiError(DomainError::NotFound {
                entity,
                id: String::new(),
            })
        })?;

    raw.parse().map_err(|_| {
        tracing::debug!(entity, id = %raw, "Unparsable id in path");
        ApiError(DomainError::NotFound { entity, id: raw })
    })
}

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parse_id(parts, state, "User").await.map(UserId)
    }
}

impl<S> FromRequestParts<S> for GroupId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parse_id(parts, state, "Group").await.map(GroupId)
    }
}
