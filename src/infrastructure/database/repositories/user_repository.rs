use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};

use super::{db_err, is_unique_violation};
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, Role, User, UserRepositoryInterface,
};
use crate::infrastructure::database::entities::user;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn encode_roles(roles: &[Role]) -> DomainResult<String> {
    let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
    serde_json::to_string(&names).map_err(|e| DomainError::Storage {
        code: "DB_ENCODE",
        message: e.to_string(),
    })
}

fn decode_roles(user_id: i32, raw: &str) -> DomainResult<Vec<Role>> {
    let decode_err = |message: String| DomainError::Storage {
        code: "DB_DECODE",
        message: format!("Invalid roles for user {}: {}", user_id, message),
    };

    let names: Vec<String> = serde_json::from_str(raw).map_err(|e| decode_err(e.to_string()))?;
    names
        .iter()
        .map(|name| name.parse::<Role>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(decode_err)
}

pub(crate) fn user_model_to_domain(model: user::Model) -> DomainResult<User> {
    let roles = decode_roles(model.id, &model.roles)?;
    Ok(User {
        id: model.id,
        email: model.email,
        full_name: model.full_name,
        password_hash: model.password_hash,
        roles,
    })
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let new_user = user::ActiveModel {
            id: NotSet,
            email: Set(dto.email),
            full_name: Set(dto.full_name),
            password_hash: Set(dto.password_hash),
            roles: Set(encode_roles(&dto.roles)?),
        };

        let model = new_user.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::user_exists()
            } else {
                db_err(e)
            }
        })?;

        user_model_to_domain(model)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        model.map(user_model_to_domain).transpose()
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        model.map(user_model_to_domain).transpose()
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn upgrade_password(&self, id: i32, new_password_hash: &str) -> DomainResult<()> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(new_password_hash))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::user_not_found(id));
        }

        Ok(())
    }

    async fn delete_user(&self, id: i32) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::user_not_found(id));
        }

        Ok(())
    }
}
