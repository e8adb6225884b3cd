//! Database entities module

pub mod group;
pub mod user;
pub mod user_group;

pub use group::Entity as Group;
pub use user::Entity as User;
pub use user_group::Entity as UserGroup;
