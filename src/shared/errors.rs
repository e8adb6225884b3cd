use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} does not exist!")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation: {0}")]
    Validation(String),

    /// Uniqueness violation (name or email already taken).
    #[error("{0}")]
    Conflict(String),

    /// Rule on the user/group association was violated.
    #[error("{0}")]
    Relationship(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {message}")]
    Storage { code: &'static str, message: String },

    /// Server-side fault outside persistence (token signing, hashing).
    #[error("Internal error: {message}")]
    Internal { code: &'static str, message: String },
}

impl DomainError {
    pub fn user_not_found(id: i32) -> Self {
        Self::NotFound {
            entity: "User",
            id: id.to_string(),
        }
    }

    pub fn group_not_found(id: i32) -> Self {
        Self::NotFound {
            entity: "Group",
            id: id.to_string(),
        }
    }

    pub fn user_exists() -> Self {
        Self::Conflict("User already exists!".into())
    }

    pub fn group_exists() -> Self {
        Self::Conflict("Group already exists!".into())
    }

    pub fn group_has_users() -> Self {
        Self::Relationship("Group has related users!".into())
    }

    pub fn already_member() -> Self {
        Self::Relationship("User already exists in this group!".into())
    }

    pub fn not_member() -> Self {
        Self::Relationship("User does not exist in this group!".into())
    }

    pub fn internal(code: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Internal {
            code,
            message: err.to_string(),
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Storage { code, .. } if *code == "DB_CONNECTION")
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(DomainError::group_not_found(7).to_string(), "Group does not exist!");
        assert_eq!(DomainError::user_not_found(7).to_string(), "User does not exist!");
    }

    #[test]
    fn conflict_message_is_passed_through() {
        let err = DomainError::Conflict("Group already exists!".into());
        assert_eq!(err.to_string(), "Group already exists!");
    }

    #[test]
    fn only_connection_failures_are_transient() {
        let conn = DomainError::Storage {
            code: "DB_CONNECTION",
            message: "pool timed out".into(),
        };
        let exec = DomainError::Storage {
            code: "DB_EXEC",
            message: "disk I/O error".into(),
        };
        assert!(conn.is_transient());
        assert!(!exec.is_transient());
        assert!(!DomainError::Validation("x".into()).is_transient());
    }
}
