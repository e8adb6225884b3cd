//! Identity module: user management & authentication
//!
//! Contains the `UserService` which orchestrates all user-related
//! use-cases: login, creation, deletion and group membership.

pub mod service;

pub use service::{AuthResult, UserService};
