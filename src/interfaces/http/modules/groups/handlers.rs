//! Group management API handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::dto::{CreateGroupRequest, GroupDto};
use crate::application::GroupService;
use crate::interfaces::http::common::{ApiError, GroupId, MessageResponse, ValidatedJson};
use crate::interfaces::http::middleware::{AdminUser, AuthenticatedUser};

/// Group handler state
#[derive(Clone)]
pub struct GroupHandlerState {
    pub group_service: Arc<GroupService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/groups/",
    tag = "Groups",
    security(("bearer_auth" = [])),
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = GroupDto),
        (status = 403, description = "Admin role required", body = MessageResponse),
        (status = 409, description = "Group already exists", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    )
)]
pub async fn create_group(
    AdminUser(_admin): AdminUser,
    State(state): State<GroupHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupDto>), ApiError> {
    let details = state.group_service.create_group(&request.name).await?;
    Ok((StatusCode::CREATED, Json(GroupDto::from(details))))
}

#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}",
    tag = "Groups",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group details", body = GroupDto),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 409, description = "Group does not exist", body = MessageResponse)
    )
)]
pub async fn get_group(
    _user: AuthenticatedUser,
    State(state): State<GroupHandlerState>,
    GroupId(id): GroupId,
) -> Result<Json<GroupDto>, ApiError> {
    let details = state.group_service.get_group(id).await?;
    Ok(Json(GroupDto::from(details)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/groups/{id}",
    tag = "Groups",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group deleted", body = MessageResponse),
        (status = 403, description = "Admin role required", body = MessageResponse),
        (status = 409, description = "Group does not exist or has related users", body = MessageResponse)
    )
)]
pub async fn delete_group(
    AdminUser(_admin): AdminUser,
    State(state): State<GroupHandlerState>,
    GroupId(id): GroupId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.group_service.delete_group(id).await?;
    Ok(Json(MessageResponse::new("Group deleted successfully!")))
}
