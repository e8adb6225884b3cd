use std::fmt;
use std::str::FromStr;

use crate::domain::Group;

/// User role
///
/// Every user implicitly holds [`Role::User`]; it is never required in the
/// stored role list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_USER" => Ok(Role::User),
            "ROLE_ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Roles a user effectively holds: the stored roles plus the base role,
/// sorted and without duplicates.
pub fn effective_roles(stored: &[Role]) -> Vec<Role> {
    let mut roles = Vec::with_capacity(stored.len() + 1);
    roles.extend_from_slice(stored);
    roles.push(Role::User);
    roles.sort();
    roles.dedup();
    roles
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    /// Canonical stored roles, without the implicit base role.
    pub roles: Vec<Role>,
}

impl User {
    pub fn effective_roles(&self) -> Vec<Role> {
        effective_roles(&self.roles)
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

/// A user together with the groups it belongs to.
#[derive(Clone, Debug)]
pub struct UserDetails {
    pub user: User,
    pub groups: Vec<Group>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(roles: Vec<Role>) -> User {
        User {
            id: 1,
            email: "alice@x.com".into(),
            full_name: "Alice".into(),
            password_hash: "$2b$04$hash".into(),
            roles,
        }
    }

    #[test]
    fn base_role_is_always_present() {
        assert_eq!(effective_roles(&[]), vec![Role::User]);
        assert_eq!(effective_roles(&[Role::Admin]), vec![Role::User, Role::Admin]);
    }

    #[test]
    fn duplicates_are_collapsed() {
        let roles = effective_roles(&[Role::Admin, Role::User, Role::Admin]);
        assert_eq!(roles, vec![Role::User, Role::Admin]);
    }

    #[test]
    fn derivation_leaves_stored_roles_untouched() {
        let user = sample_user(vec![]);
        assert_eq!(user.effective_roles(), vec![Role::User]);
        assert!(user.roles.is_empty());
        assert!(!user.is_admin());
    }

    #[test]
    fn role_names_round_trip() {
        for role in [Role::User, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("ROLE_ROOT".parse::<Role>().is_err());
    }
}
