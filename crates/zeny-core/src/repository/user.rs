//! User repository trait definition.

use zeny_types::error::RepositoryError;
use zeny_types::user::{User, UserId};

/// Repository trait for user account persistence.
///
/// Implementations must enforce username uniqueness and report a duplicate
/// as `RepositoryError::Conflict`.
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Returns the stored user.
    fn create(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Get a user by exact username.
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Get any user carrying the admin flag.
    fn find_admin(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Replace a user's username and password hash.
    ///
    /// Returns `NotFound` if no user has this ID and `Conflict` if the new
    /// username belongs to another user.
    fn update_credentials(
        &self,
        id: &UserId,
        username: &str,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
