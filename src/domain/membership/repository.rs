use async_trait::async_trait;

use crate::domain::{DomainResult, Group, User};

#[async_trait]
pub trait MembershipRepositoryInterface: Send + Sync {
    /// Insert the edge. An existing edge surfaces as
    /// `DomainError::Relationship`.
    async fn attach(&self, user_id: i32, group_id: i32) -> DomainResult<()>;

    /// Remove the edge. Returns `false` when there was nothing to remove.
    async fn detach(&self, user_id: i32, group_id: i32) -> DomainResult<bool>;

    async fn is_member(&self, user_id: i32, group_id: i32) -> DomainResult<bool>;
    async fn count_users(&self, group_id: i32) -> DomainResult<u64>;

    /// Groups of a user, ordered by name.
    async fn groups_of_user(&self, user_id: i32) -> DomainResult<Vec<Group>>;

    /// Members of a group, ordered by email.
    async fn users_of_group(&self, group_id: i32) -> DomainResult<Vec<User>>;
}
