//! User aggregate
//!
//! Contains the User entity, role derivation, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_create;

pub use model::{effective_roles, Role, User, UserDetails};

pub use dto_create::CreateUserDto;

pub use repository::UserRepositoryInterface;
