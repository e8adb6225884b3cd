//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Group, UserDetails};

/// Group reference embedded in a user view
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupRefDto {
    pub id: i32,
    pub name: String,
}

impl From<Group> for GroupRefDto {
    fn from(g: Group) -> Self {
        Self {
            id: g.id,
            name: g.name,
        }
    }
}

/// User API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    /// Effective roles (always includes `ROLE_USER`)
    pub roles: Vec<String>,
    pub groups: Vec<GroupRefDto>,
}

impl From<UserDetails> for UserDto {
    fn from(details: UserDetails) -> Self {
        let roles = details
            .user
            .effective_roles()
            .iter()
            .map(|r| r.as_str().to_string())
            .collect();

        Self {
            id: details.user.id,
            email: details.user.email,
            full_name: details.user.full_name,
            roles,
            groups: details.groups.into_iter().map(GroupRefDto::from).collect(),
        }
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(
        email(message = "invalid email format"),
        length(max = 180, message = "email must be at most 180 characters")
    )]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "full_name must be 1-255 characters"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Attach / detach request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MembershipRequest {
    pub group_id: i32,
}
