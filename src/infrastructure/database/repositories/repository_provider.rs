//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{
    GroupRepositoryInterface, MembershipRepositoryInterface, RepositoryProvider,
    UserRepositoryInterface,
};

use super::group_repository::GroupRepository;
use super::membership_repository::MembershipRepository;
use super::user_repository::UserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    users: UserRepository,
    groups: GroupRepository,
    memberships: MembershipRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            groups: GroupRepository::new(db.clone()),
            memberships: MembershipRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn groups(&self) -> &dyn GroupRepositoryInterface {
        &self.groups
    }

    fn memberships(&self) -> &dyn MembershipRepositoryInterface {
        &self.memberships
    }
}
