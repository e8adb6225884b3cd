//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{LoginRequest, LoginResponse};
use crate::application::UserService;
use crate::interfaces::http::common::{ApiError, MessageResponse, ValidatedJson};

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let auth = state
        .user_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token: auth.token,
        token_type: auth.token_type,
        expires_in: auth.expires_in,
    }))
}
