//! Shared HTTP building blocks: response bodies, error mapping, extractors

pub mod error;
pub mod path_id;
pub mod responses;
pub mod validated_json;

pub use error::ApiError;
pub use path_id::{GroupId, UserId};
pub use responses::{MessageResponse, StorageErrorResponse};
pub use validated_json::ValidatedJson;
