//! Common API response bodies

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Business outcome or failure: `{"message": "..."}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Persistence failure: `{"status": "error", "code": "...", "message": "..."}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StorageErrorResponse {
    /// Always `error`
    pub status: String,
    /// Machine-readable failure code, e.g. `DB_CONNECTION`
    pub code: String,
    pub message: String,
}

impl StorageErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            code: code.into(),
            message: message.into(),
        }
    }
}
