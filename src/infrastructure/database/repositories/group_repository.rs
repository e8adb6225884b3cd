use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};

use super::{db_err, is_foreign_key_violation, is_unique_violation};
use crate::domain::{CreateGroupDto, DomainError, DomainResult, Group, GroupRepositoryInterface};
use crate::infrastructure::database::entities::group;

pub struct GroupRepository {
    db: DatabaseConnection,
}

impl GroupRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn group_model_to_domain(model: group::Model) -> Group {
    Group {
        id: model.id,
        name: model.name,
        created_at: model.created_at,
    }
}

#[async_trait]
impl GroupRepositoryInterface for GroupRepository {
    async fn create_group(&self, dto: CreateGroupDto) -> DomainResult<Group> {
        let new_group = group::ActiveModel {
            id: NotSet,
            name: Set(dto.name),
            created_at: Set(dto.created_at),
        };

        let model = new_group.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::group_exists()
            } else {
                db_err(e)
            }
        })?;

        Ok(group_model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Group>> {
        let model = group::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(group_model_to_domain))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Group>> {
        let model = group::Entity::find()
            .filter(group::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(group_model_to_domain))
    }

    async fn delete_group(&self, id: i32) -> DomainResult<()> {
        let result = group::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    DomainError::group_has_users()
                } else {
                    db_err(e)
                }
            })?;

        if result.rows_affected == 0 {
            return Err(DomainError::group_not_found(id));
        }

        Ok(())
    }
}
