use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct CreateGroupDto {
    pub name: String,
    pub created_at: DateTime<Utc>,
}
