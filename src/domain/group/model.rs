use chrono::{DateTime, Utc};

use crate::domain::User;

/// Group model
#[derive(Clone, Debug)]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A group together with its members.
#[derive(Clone, Debug)]
pub struct GroupDetails {
    pub group: Group,
    pub users: Vec<User>,
}

