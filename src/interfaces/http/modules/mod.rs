pub mod auth;
pub mod groups;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod users;
