//! Domain layer: users, groups and the membership edge set between them.

pub mod group;
pub mod membership;
pub mod repositories;
pub mod user;

pub use group::{CreateGroupDto, Group, GroupDetails, GroupRepositoryInterface};
pub use membership::MembershipRepositoryInterface;
pub use repositories::RepositoryProvider;
pub use user::{effective_roles, CreateUserDto, Role, User, UserDetails, UserRepositoryInterface};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::{DomainError, DomainResult};
