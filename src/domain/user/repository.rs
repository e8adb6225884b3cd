use async_trait::async_trait;

use super::{CreateUserDto, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Insert a user. A taken email surfaces as `DomainError::Conflict`.
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn count(&self) -> DomainResult<u64>;

    /// Replace the stored password hash (rehash on login).
    async fn upgrade_password(&self, id: i32, new_password_hash: &str) -> DomainResult<()>;

    /// Delete a user and, through the cascade, its memberships.
    async fn delete_user(&self, id: i32) -> DomainResult<()>;
}
