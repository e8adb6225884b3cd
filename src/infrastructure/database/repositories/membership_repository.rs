use async_trait::async_trait;
use sea_orm::sea_query::JoinType;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

use super::group_repository::group_model_to_domain;
use super::user_repository::user_model_to_domain;
use super::{db_err, is_foreign_key_violation, is_unique_violation};
use crate::domain::{DomainError, DomainResult, Group, MembershipRepositoryInterface, User};
use crate::infrastructure::database::entities::{group, user, user_group};

pub struct MembershipRepository {
    db: DatabaseConnection,
}

impl MembershipRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MembershipRepositoryInterface for MembershipRepository {
    async fn attach(&self, user_id: i32, group_id: i32) -> DomainResult<()> {
        let edge = user_group::ActiveModel {
            user_id: Set(user_id),
            group_id: Set(group_id),
        };

        user_group::Entity::insert(edge)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::already_member()
                } else if is_foreign_key_violation(&e) {
                    DomainError::Relationship("User or group does not exist!".into())
                } else {
                    db_err(e)
                }
            })?;

        Ok(())
    }

    async fn detach(&self, user_id: i32, group_id: i32) -> DomainResult<bool> {
        let result = user_group::Entity::delete_many()
            .filter(user_group::Column::UserId.eq(user_id))
            .filter(user_group::Column::GroupId.eq(group_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn is_member(&self, user_id: i32, group_id: i32) -> DomainResult<bool> {
        let edge = user_group::Entity::find_by_id((user_id, group_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(edge.is_some())
    }

    async fn count_users(&self, group_id: i32) -> DomainResult<u64> {
        user_group::Entity::find()
            .filter(user_group::Column::GroupId.eq(group_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn groups_of_user(&self, user_id: i32) -> DomainResult<Vec<Group>> {
        let models = group::Entity::find()
            .join(JoinType::InnerJoin, group::Relation::UserGroups.def())
            .filter(user_group::Column::UserId.eq(user_id))
            .order_by_asc(group::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(group_model_to_domain).collect())
    }

    async fn users_of_group(&self, group_id: i32) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .join(JoinType::InnerJoin, user::Relation::UserGroups.def())
            .filter(user_group::Column::GroupId.eq(group_id))
            .order_by_asc(user::Column::Email)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        models.into_iter().map(user_model_to_domain).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{
        CreateGroupDto, CreateUserDto, GroupRepositoryInterface, UserRepositoryInterface,
    };
    use crate::infrastructure::database::repositories::test_support::test_db;
    use crate::infrastructure::database::repositories::{GroupRepository, UserRepository};

    struct Fixture {
        users: UserRepository,
        groups: GroupRepository,
        memberships: MembershipRepository,
    }

    async fn fixture() -> Fixture {
        let db = test_db().await;
        Fixture {
            users: UserRepository::new(db.clone()),
            groups: GroupRepository::new(db.clone()),
            memberships: MembershipRepository::new(db),
        }
    }

    async fn add_user(f: &Fixture, email: &str) -> User {
        f.users
            .create_user(CreateUserDto {
                email: email.into(),
                full_name: "Someone".into(),
                password_hash: "$2b$04$placeholder".into(),
                roles: vec![],
            })
            .await
            .unwrap()
    }

    async fn add_group(f: &Fixture, name: &str) -> Group {
        f.groups
            .create_group(CreateGroupDto {
                name: name.into(),
                created_at: Utc::now(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn attach_is_visible_from_both_sides() {
        let f = fixture().await;
        let alice = add_user(&f, "alice@x.com").await;
        let bob = add_user(&f, "bob@x.com").await;
        let eng = add_group(&f, "eng").await;
        let ops = add_group(&f, "ops").await;

        f.memberships.attach(bob.id, eng.id).await.unwrap();
        f.memberships.attach(alice.id, eng.id).await.unwrap();
        f.memberships.attach(alice.id, ops.id).await.unwrap();

        let groups: Vec<String> = f
            .memberships
            .groups_of_user(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(groups, vec!["eng", "ops"]);

        let members: Vec<String> = f
            .memberships
            .users_of_group(eng.id)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(members, vec!["alice@x.com", "bob@x.com"]);
        assert_eq!(f.memberships.count_users(eng.id).await.unwrap(), 2);
        assert_eq!(f.memberships.count_users(ops.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn second_attach_keeps_a_single_edge() {
        let f = fixture().await;
        let alice = add_user(&f, "alice@x.com").await;
        let eng = add_group(&f, "eng").await;

        f.memberships.attach(alice.id, eng.id).await.unwrap();
        let err = f.memberships.attach(alice.id, eng.id).await.unwrap_err();

        assert_eq!(err.to_string(), "User already exists in this group!");
        assert_eq!(f.memberships.count_users(eng.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn attach_to_missing_group_violates_foreign_key() {
        let f = fixture().await;
        let alice = add_user(&f, "alice@x.com").await;

        let err = f.memberships.attach(alice.id, 42).await.unwrap_err();
        assert!(matches!(err, DomainError::Relationship(_)));
    }

    #[tokio::test]
    async fn detach_removes_exactly_one_edge() {
        let f = fixture().await;
        let alice = add_user(&f, "alice@x.com").await;
        let eng = add_group(&f, "eng").await;
        let ops = add_group(&f, "ops").await;

        f.memberships.attach(alice.id, eng.id).await.unwrap();
        f.memberships.attach(alice.id, ops.id).await.unwrap();

        assert!(f.memberships.detach(alice.id, eng.id).await.unwrap());
        assert!(!f.memberships.is_member(alice.id, eng.id).await.unwrap());
        assert!(f.memberships.is_member(alice.id, ops.id).await.unwrap());

        assert!(!f.memberships.detach(alice.id, eng.id).await.unwrap());
    }

    #[tokio::test]
    async fn group_with_members_cannot_be_deleted() {
        let f = fixture().await;
        let alice = add_user(&f, "alice@x.com").await;
        let eng = add_group(&f, "eng").await;
        f.memberships.attach(alice.id, eng.id).await.unwrap();

        let err = f.groups.delete_group(eng.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Group has related users!");
        assert!(f.groups.find_by_id(eng.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_its_memberships() {
        let f = fixture().await;
        let alice = add_user(&f, "alice@x.com").await;
        let eng = add_group(&f, "eng").await;
        f.memberships.attach(alice.id, eng.id).await.unwrap();

        f.users.delete_user(alice.id).await.unwrap();

        assert_eq!(f.memberships.count_users(eng.id).await.unwrap(), 0);
        f.groups.delete_group(eng.id).await.unwrap();
    }
}
