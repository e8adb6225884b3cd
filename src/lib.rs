//! # Roster
//!
//! Authenticated REST API managing users, groups and the many-to-many
//! membership between them.
//!
//! ## Architecture
//!
//! - **domain**: entities, repository traits and the error taxonomy
//! - **application**: use cases (`UserService`, `GroupService`)
//! - **infrastructure**: SeaORM persistence, migrations, JWT and bcrypt
//! - **interfaces**: axum REST API with Swagger documentation
//! - **server**: runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
