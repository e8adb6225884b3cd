use super::Role;

/// Everything needed to insert a user row. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}
