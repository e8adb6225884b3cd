//! User–group membership
//!
//! The association is stored once, as `(user_id, group_id)` edges. Both
//! directions (groups of a user, users of a group) are derived lookups.

pub mod repository;

pub use repository::MembershipRepositoryInterface;
