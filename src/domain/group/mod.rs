//! Group aggregate

pub mod model;
pub mod repository;

mod dto_create;

pub use dto_create::CreateGroupDto;
pub use model::{Group, GroupDetails};
pub use repository::GroupRepositoryInterface;
