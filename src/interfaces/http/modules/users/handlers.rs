//! User management API handlers
//!
//! Reads are open to any authenticated principal; every mutation takes
//! [`AdminUser`]. Delegates to `UserService` from the application/identity
//! layer.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::dto::{CreateUserRequest, MembershipRequest, UserDto};
use crate::application::UserService;
use crate::interfaces::http::common::{ApiError, MessageResponse, UserId, ValidatedJson};
use crate::interfaces::http::middleware::{AdminUser, AuthenticatedUser};

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/users/",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin role required", body = MessageResponse),
        (status = 409, description = "User already exists", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    )
)]
pub async fn create_user(
    AdminUser(_admin): AdminUser,
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let details = state
        .user_service
        .create_user(&request.email, &request.full_name, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(details))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserDto),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 409, description = "User does not exist", body = MessageResponse)
    )
)]
pub async fn get_user(
    _user: AuthenticatedUser,
    State(state): State<UserHandlerState>,
    UserId(id): UserId,
) -> Result<Json<UserDto>, ApiError> {
    let details = state.user_service.get_user(id).await?;
    Ok(Json(UserDto::from(details)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "Admin role required", body = MessageResponse),
        (status = 409, description = "User does not exist", body = MessageResponse)
    )
)]
pub async fn delete_user(
    AdminUser(_admin): AdminUser,
    State(state): State<UserHandlerState>,
    UserId(id): UserId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.user_service.delete_user(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully!")))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/attach-group",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = MembershipRequest,
    responses(
        (status = 200, description = "User with the group attached", body = UserDto),
        (status = 403, description = "Admin role required", body = MessageResponse),
        (status = 409, description = "Missing user or group, or already a member", body = MessageResponse)
    )
)]
pub async fn attach_group(
    AdminUser(_admin): AdminUser,
    State(state): State<UserHandlerState>,
    UserId(id): UserId,
    ValidatedJson(request): ValidatedJson<MembershipRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let details = state
        .user_service
        .attach_group(id, request.group_id)
        .await?;
    Ok(Json(UserDto::from(details)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/detach-group",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = MembershipRequest,
    responses(
        (status = 200, description = "User with the group detached", body = UserDto),
        (status = 403, description = "Admin role required", body = MessageResponse),
        (status = 409, description = "Missing user or group, or not a member", body = MessageResponse)
    )
)]
pub async fn detach_group(
    AdminUser(_admin): AdminUser,
    State(state): State<UserHandlerState>,
    UserId(id): UserId,
    ValidatedJson(request): ValidatedJson<MembershipRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let details = state
        .user_service
        .detach_group(id, request.group_id)
        .await?;
    Ok(Json(UserDto::from(details)))
}
