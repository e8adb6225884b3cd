//! Users module: user management and group membership

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
