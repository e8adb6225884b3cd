//! User management service: application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, RepositoryProvider, Role, User, UserDetails,
};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::PasswordHasher;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// User service. Orchestrates all identity / user-management use-cases.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    hasher: PasswordHasher,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        hasher: PasswordHasher,
        jwt_config: JwtConfig,
    ) -> Self {
        Self {
            repos,
            hasher,
            jwt_config,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email + password and return a JWT.
    ///
    /// A hash produced with a different bcrypt cost than the configured one
    /// is transparently replaced after a successful verification.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repos.users().find_by_email(email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = self
            .hasher
            .verify(password, &user.password_hash)
            .unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        if self.hasher.needs_rehash(&user.password_hash) {
            self.upgrade_password(&user, password).await;
        }

        let token = create_token(&user, &self.jwt_config)
            .map_err(|e| DomainError::internal("TOKEN", e))?;
        let expires_in = self
            .jwt_config
            .lifetime()
            .map_or(0, |lifetime| lifetime.num_seconds());

        info!(user_id = user.id, "User logged in");

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in,
            user,
        })
    }

    /// Best effort: a failed upgrade never fails the login.
    async fn upgrade_password(&self, user: &User, password: &str) {
        let new_hash = match self.hasher.hash(password) {
            Ok(hash) => hash,
            Err(e) => {
                warn!(user_id = user.id, error = %e, "Password rehash failed");
                return;
            }
        };

        match self.repos.users().upgrade_password(user.id, &new_hash).await {
            Ok(()) => info!(
                user_id = user.id,
                cost = self.hasher.cost(),
                "Password hash upgraded"
            ),
            Err(e) => warn!(user_id = user.id, error = %e, "Password hash upgrade failed"),
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Get a user together with its groups.
    pub async fn get_user(&self, id: i32) -> DomainResult<UserDetails> {
        let user = self.require_user(id).await?;
        let groups = self.repos.memberships().groups_of_user(id).await?;
        Ok(UserDetails { user, groups })
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Create a user with an empty stored role list.
    pub async fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> DomainResult<UserDetails> {
        self.create_user_with_roles(email, full_name, password, Vec::new())
            .await
    }

    /// Create a user with an explicit stored role list (default admin seeding).
    pub async fn create_user_with_roles(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
        roles: Vec<Role>,
    ) -> DomainResult<UserDetails> {
        let email = email.trim();
        let full_name = full_name.trim();

        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        if full_name.is_empty() {
            return Err(DomainError::Validation("Full name must not be blank".into()));
        }
        if password.is_empty() {
            return Err(DomainError::Validation("Password must not be empty".into()));
        }

        if self.repos.users().find_by_email(email).await?.is_some() {
            return Err(DomainError::user_exists());
        }

        let password_hash = self
            .hasher
            .hash(password)
            .map_err(|e| DomainError::internal("PASSWORD_HASH", e))?;

        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                email: email.to_string(),
                full_name: full_name.to_string(),
                password_hash,
                roles,
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "User created");
        Ok(UserDetails {
            user,
            groups: Vec::new(),
        })
    }

    /// Delete a user. Its memberships go with it.
    pub async fn delete_user(&self, id: i32) -> DomainResult<()> {
        self.require_user(id).await?;
        self.repos.users().delete_user(id).await?;

        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Add the user to a group.
    ///
    /// Checks run in a fixed order: user exists, group exists, not yet a member.
    pub async fn attach_group(&self, user_id: i32, group_id: i32) -> DomainResult<UserDetails> {
        self.require_user(user_id).await?;
        self.require_group(group_id).await?;

        let memberships = self.repos.memberships();
        if memberships.is_member(user_id, group_id).await? {
            return Err(DomainError::already_member());
        }
        memberships.attach(user_id, group_id).await?;

        metrics::counter!("roster_membership_changes_total", "action" => "attach").increment(1);
        info!(user_id, group_id, "User attached to group");

        self.get_user(user_id).await
    }

    /// Remove the user from a group. Same check order as [`Self::attach_group`].
    pub async fn detach_group(&self, user_id: i32, group_id: i32) -> DomainResult<UserDetails> {
        self.require_user(user_id).await?;
        self.require_group(group_id).await?;

        // Concurrent detach of the same edge: the loser sees no row removed.
        if !self.repos.memberships().detach(user_id, group_id).await? {
            return Err(DomainError::not_member());
        }

        metrics::counter!("roster_membership_changes_total", "action" => "detach").increment(1);
        info!(user_id, group_id, "User detached from group");

        self.get_user(user_id).await
    }

    /// Current state of the user a token was issued to, `None` once deleted.
    pub async fn find_principal(&self, id: i32) -> DomainResult<Option<User>> {
        self.repos.users().find_by_id(id).await
    }

    /// Number of stored users.
    pub async fn count_users(&self) -> DomainResult<u64> {
        self.repos.users().count().await
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn require_user(&self, id: i32) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    async fn require_group(&self, id: i32) -> DomainResult<()> {
        self.repos
            .groups()
            .find_by_id(id)
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::group_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::CreateGroupDto;
    use crate::infrastructure::database::repositories::test_support::test_db;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    async fn setup() -> (UserService, Arc<dyn RepositoryProvider>) {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_db().await));
        let service = UserService::new(
            repos.clone(),
            PasswordHasher::new(4),
            JwtConfig::default(),
        );
        (service, repos)
    }

    async fn add_group(repos: &Arc<dyn RepositoryProvider>, name: &str) -> i32 {
        repos
            .groups()
            .create_group(CreateGroupDto {
                name: name.into(),
                created_at: Utc::now(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn created_user_holds_only_the_base_role() {
        let (service, _) = setup().await;

        let details = service
            .create_user("alice@x.com", "Alice", "secret")
            .await
            .unwrap();

        assert!(details.user.roles.is_empty());
        assert_eq!(details.user.effective_roles(), vec![Role::User]);
        assert!(details.groups.is_empty());
        assert_ne!(details.user.password_hash, "secret");
    }

    #[tokio::test]
    async fn duplicate_email_performs_no_write() {
        let (service, _) = setup().await;
        service
            .create_user("alice@x.com", "Alice", "secret")
            .await
            .unwrap();

        let err = service
            .create_user("alice@x.com", "Other", "secret")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "User already exists!");
        assert_eq!(service.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let (service, _) = setup().await;

        for (email, name, password) in [
            ("", "Alice", "secret"),
            ("not-an-email", "Alice", "secret"),
            ("alice@x.com", "  ", "secret"),
            ("alice@x.com", "Alice", ""),
        ] {
            let err = service.create_user(email, name, password).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{email:?} {name:?}");
        }
        assert_eq!(service.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn get_missing_user_is_reported() {
        let (service, _) = setup().await;
        let err = service.get_user(99).await.unwrap_err();
        assert_eq!(err.to_string(), "User does not exist!");
    }

    #[tokio::test]
    async fn attach_then_detach() {
        let (service, repos) = setup().await;
        let user = service
            .create_user("alice@x.com", "Alice", "secret")
            .await
            .unwrap()
            .user;
        let eng = add_group(&repos, "eng").await;

        let attached = service.attach_group(user.id, eng).await.unwrap();
        assert_eq!(attached.groups.len(), 1);
        assert_eq!(attached.groups[0].name, "eng");

        let again = service.attach_group(user.id, eng).await.unwrap_err();
        assert_eq!(again.to_string(), "User already exists in this group!");
        assert_eq!(repos.memberships().count_users(eng).await.unwrap(), 1);

        let detached = service.detach_group(user.id, eng).await.unwrap();
        assert!(detached.groups.is_empty());

        let err = service.detach_group(user.id, eng).await.unwrap_err();
        assert_eq!(err.to_string(), "User does not exist in this group!");
    }

    #[tokio::test]
    async fn membership_checks_run_in_order() {
        let (service, repos) = setup().await;
        let eng = add_group(&repos, "eng").await;

        // Missing user and missing group: the user is reported first.
        let err = service.attach_group(7, 8).await.unwrap_err();
        assert_eq!(err.to_string(), "User does not exist!");
        let err = service.detach_group(7, eng).await.unwrap_err();
        assert_eq!(err.to_string(), "User does not exist!");

        let user = service
            .create_user("alice@x.com", "Alice", "secret")
            .await
            .unwrap()
            .user;
        let err = service.attach_group(user.id, 8).await.unwrap_err();
        assert_eq!(err.to_string(), "Group does not exist!");
        let err = service.detach_group(user.id, 8).await.unwrap_err();
        assert_eq!(err.to_string(), "Group does not exist!");
    }

    #[tokio::test]
    async fn delete_user_drops_memberships() {
        let (service, repos) = setup().await;
        let user = service
            .create_user("alice@x.com", "Alice", "secret")
            .await
            .unwrap()
            .user;
        let eng = add_group(&repos, "eng").await;
        service.attach_group(user.id, eng).await.unwrap();

        service.delete_user(user.id).await.unwrap();
        assert_eq!(repos.memberships().count_users(eng).await.unwrap(), 0);

        let err = service.delete_user(user.id).await.unwrap_err();
        assert_eq!(err.to_string(), "User does not exist!");
    }

    #[tokio::test]
    async fn login_with_valid_and_invalid_credentials() {
        let (service, _) = setup().await;
        service
            .create_user("alice@x.com", "Alice", "secret")
            .await
            .unwrap();

        let auth = service.login("alice@x.com", "secret").await.unwrap();
        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.expires_in, 24 * 3600);
        assert!(!auth.token.is_empty());

        let wrong = service.login("alice@x.com", "nope").await.unwrap_err();
        assert!(matches!(wrong, DomainError::Unauthorized(_)));
        let unknown = service.login("bob@x.com", "secret").await.unwrap_err();
        assert!(matches!(unknown, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn login_upgrades_hash_when_cost_changes() {
        let (service, repos) = setup().await;
        let user = service
            .create_user("alice@x.com", "Alice", "secret")
            .await
            .unwrap()
            .user;
        assert!(user.password_hash.starts_with("$2b$04$"));

        let stronger = UserService::new(
            repos.clone(),
            PasswordHasher::new(5),
            JwtConfig::default(),
        );
        stronger.login("alice@x.com", "secret").await.unwrap();

        let reloaded = repos.users().find_by_id(user.id).await.unwrap().unwrap();
        assert!(reloaded.password_hash.starts_with("$2b$05$"));
        stronger.login("alice@x.com", "secret").await.unwrap();
    }

    #[tokio::test]
    async fn unusable_token_lifetime_fails_login_without_panicking() {
        let (_, repos) = setup().await;
        let service = UserService::new(
            repos,
            PasswordHasher::new(4),
            JwtConfig {
                expiration_hours: 1_000_000_000_000_000,
                ..JwtConfig::default()
            },
        );
        service
            .create_user("alice@x.com", "Alice", "secret")
            .await
            .unwrap();

        let err = service.login("alice@x.com", "secret").await.unwrap_err();
        assert!(matches!(err, DomainError::Internal { code: "TOKEN", .. }));
    }
}
