//! Repository provider for the domain layer

use super::group::GroupRepositoryInterface;
use super::membership::MembershipRepositoryInterface;
use super::user::UserRepositoryInterface;

/// Provides access to all domain repositories.
///
/// Services hold an `Arc<dyn RepositoryProvider>` and request only the
/// repository they need:
///
/// ```ignore
/// let user = repos.users().find_by_id(1).await?;
/// let groups = repos.memberships().groups_of_user(1).await?;
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepositoryInterface;
    fn groups(&self) -> &dyn GroupRepositoryInterface;
    fn memberships(&self) -> &dyn MembershipRepositoryInterface;
}
