//! Group management service

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{CreateGroupDto, DomainError, DomainResult, GroupDetails, RepositoryProvider};

pub struct GroupService {
    repos: Arc<dyn RepositoryProvider>,
}

impl GroupService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Create a group stamped with the current time.
    pub async fn create_group(&self, name: &str) -> DomainResult<GroupDetails> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Group name must not be blank".into()));
        }

        if self.repos.groups().find_by_name(name).await?.is_some() {
            return Err(DomainError::group_exists());
        }

        let group = self
            .repos
            .groups()
            .create_group(CreateGroupDto {
                name: name.to_string(),
                created_at: Utc::now(),
            })
            .await?;

        info!(group_id = group.id, name = %group.name, "Group created");
        Ok(GroupDetails {
            group,
            users: Vec::new(),
        })
    }

    /// Get a group together with its members.
    pub async fn get_group(&self, id: i32) -> DomainResult<GroupDetails> {
        let group = self
            .repos
            .groups()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::group_not_found(id))?;
        let users = self.repos.memberships().users_of_group(id).await?;

        Ok(GroupDetails { group, users })
    }

    /// Delete a group that has no members.
    pub async fn delete_group(&self, id: i32) -> DomainResult<()> {
        if self.repos.groups().find_by_id(id).await?.is_none() {
            return Err(DomainError::group_not_found(id));
        }
        if self.repos.memberships().count_users(id).await? > 0 {
            return Err(DomainError::group_has_users());
        }

        self.repos.groups().delete_group(id).await?;

        info!(group_id = id, "Group deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::UserService;
    use crate::infrastructure::crypto::{JwtConfig, PasswordHasher};
    use crate::infrastructure::database::repositories::test_support::test_db;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    async fn setup() -> (GroupService, UserService) {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_db().await));
        let users = UserService::new(repos.clone(), PasswordHasher::new(4), JwtConfig::default());
        (GroupService::new(repos), users)
    }

    #[tokio::test]
    async fn create_group_twice() {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_db().await));
        let groups = GroupService::new(repos.clone());

        let created = groups.create_group("eng").await.unwrap();
        assert_eq!(created.group.name, "eng");
        assert!(created.users.is_empty());

        let err = groups.create_group("eng").await.unwrap_err();
        assert_eq!(err.to_string(), "Group already exists!");

        // The rejected create left the single original row behind
        let stored = repos.groups().find_by_name("eng").await.unwrap().unwrap();
        assert_eq!(stored.id, created.group.id);
        assert!(repos
            .groups()
            .find_by_id(created.group.id + 1)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (groups, _) = setup().await;
        let err = groups.create_group("   ").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn get_group_lists_members() {
        let (groups, users) = setup().await;
        let eng = groups.create_group("eng").await.unwrap().group;
        let alice = users
            .create_user("alice@x.com", "Alice", "secret")
            .await
            .unwrap()
            .user;
        users.attach_group(alice.id, eng.id).await.unwrap();

        let details = groups.get_group(eng.id).await.unwrap();
        assert_eq!(details.users.len(), 1);
        assert_eq!(details.users[0].email, "alice@x.com");

        let err = groups.get_group(eng.id + 1).await.unwrap_err();
        assert_eq!(err.to_string(), "Group does not exist!");
    }

    #[tokio::test]
    async fn group_with_members_is_kept() {
        let (groups, users) = setup().await;
        let eng = groups.create_group("eng").await.unwrap().group;
        let alice = users
            .create_user("alice@x.com", "Alice", "secret")
            .await
            .unwrap()
            .user;
        users.attach_group(alice.id, eng.id).await.unwrap();

        let err = groups.delete_group(eng.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Group has related users!");
        assert!(groups.get_group(eng.id).await.is_ok());

        users.detach_group(alice.id, eng.id).await.unwrap();
        groups.delete_group(eng.id).await.unwrap();

        let err = groups.delete_group(eng.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Group does not exist!");
    }
}
