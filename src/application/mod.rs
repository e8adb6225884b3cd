//! Application layer: use-case orchestration on top of the repositories.

pub mod groups;
pub mod identity;

pub use groups::GroupService;
pub use identity::{AuthResult, UserService};
