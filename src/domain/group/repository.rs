use async_trait::async_trait;

use super::{CreateGroupDto, Group};
use crate::domain::DomainResult;

#[async_trait]
pub trait GroupRepositoryInterface: Send + Sync {
    /// Insert a group. A taken name surfaces as `DomainError::Conflict`.
    async fn create_group(&self, dto: CreateGroupDto) -> DomainResult<Group>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Group>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Group>>;

    /// Delete a group. Fails with `DomainError::Relationship` while members
    /// still reference it.
    async fn delete_group(&self, id: i32) -> DomainResult<()>;
}
