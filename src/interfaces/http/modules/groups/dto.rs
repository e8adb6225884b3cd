//! Group DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{GroupDetails, User};

/// Member reference embedded in a group view
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserRefDto {
    pub id: i32,
    pub email: String,
}

impl From<User> for UserRefDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
        }
    }
}

/// Group API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupDto {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub users: Vec<UserRefDto>,
}

impl From<GroupDetails> for GroupDto {
    fn from(details: GroupDetails) -> Self {
        Self {
            id: details.group.id,
            name: details.group.name,
            created_at: details.group.created_at,
            users: details.users.into_iter().map(UserRefDto::from).collect(),
        }
    }
}

/// Create group request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
}
