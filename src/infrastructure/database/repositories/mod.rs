//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod group_repository;
pub mod membership_repository;
pub mod repository_provider;
pub mod user_repository;

pub use group_repository::GroupRepository;
pub use membership_repository::MembershipRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::UserRepository;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

/// Short machine-readable code reported with persistence failures.
fn storage_code(e: &DbErr) -> &'static str {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => "DB_CONNECTION",
        DbErr::Exec(_) => "DB_EXEC",
        DbErr::Query(_) => "DB_QUERY",
        DbErr::RecordNotFound(_) | DbErr::RecordNotInserted | DbErr::RecordNotUpdated => {
            "DB_RECORD"
        }
        _ => "DB_ERROR",
    }
}

pub(crate) fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage {
        code: storage_code(&e),
        message: e.to_string(),
    }
}

pub(crate) fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub(crate) fn is_foreign_key_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
