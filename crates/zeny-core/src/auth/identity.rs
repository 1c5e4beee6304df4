//! Identity service: registration, login, token resolution and role checks.
//!
//! Ties the Credential Store (`CredentialHasher`), the Token Service
//! (`TokenService`) and the user store (`UserRepository`) together. Admin
//! credential rotation is a user-store mutation only; process configuration
//! is never rewritten at runtime.

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};
use zeny_types::config::BootstrapAdmin;
use zeny_types::error::{AuthError, RepositoryError};
use zeny_types::user::{
    LoginRequest, LoginResponse, RegisterRequest, UpdateAdminCredentialsRequest, User, UserId,
};

use crate::auth::credential::CredentialHasher;
use crate::auth::token::{TOKEN_TYPE, TokenService};
use crate::repository::user::UserRepository;

/// Result of the startup admin bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// A new admin account was created with the configured credentials.
    Created { username: String },
    /// An admin already existed; nothing was written.
    AlreadyPresent { username: String },
}

/// Service owning every identity-related use case.
///
/// Generic over the user store, the password hasher and the token service to
/// keep zeny-core free of infrastructure dependencies.
pub struct IdentityService<U: UserRepository, H: CredentialHasher, T: TokenService> {
    users: U,
    hasher: H,
    tokens: T,
}

fn unavailable(e: RepositoryError) -> AuthError {
    AuthError::Unavailable(e.to_string())
}

impl<U: UserRepository, H: CredentialHasher, T: TokenService> IdentityService<U, H, T> {
    pub fn new(users: U, hasher: H, tokens: T) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a standard (non-admin) account.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let username = request.username.trim().to_string();
        if username.is_empty() {
            return Err(AuthError::InvalidInput("username cannot be empty".to_string()));
        }
        if request.password.is_empty() {
            return Err(AuthError::InvalidInput("password cannot be empty".to_string()));
        }

        if self
            .users
            .get_by_username(&username)
            .await
            .map_err(unavailable)?
            .is_some()
        {
            return Err(AuthError::UsernameTaken(username));
        }

        let password_hash = self
            .hasher
            .hash_password(&request.password)
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let user = User {
            id: UserId::new(),
            username: username.clone(),
            email: request.email.filter(|e| !e.trim().is_empty()),
            password_hash,
            is_admin: false,
            created_at: Utc::now(),
        };

        // The existence check above is advisory; the store's uniqueness
        // constraint settles concurrent registrations.
        let user = self.users.create(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UsernameTaken(username.clone()),
            other => unavailable(other),
        })?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Verify a username/password pair and issue a bearer token.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        let user = match self
            .users
            .get_by_username(request.username.trim())
            .await
            .map_err(unavailable)?
        {
            Some(user) => user,
            None => {
                debug!("Login rejected: unknown username");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self
            .hasher
            .verify_password(&request.password, &user.password_hash)
            .await
        {
            debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&user.username, Utc::now())?;
        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
            user,
        })
    }

    /// Resolve a bearer token to the user it was issued to.
    pub async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        self.resolve_at(token, Utc::now()).await
    }

    /// Resolve a bearer token as of instant `now`.
    pub async fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Result<User, AuthError> {
        let claims = self.tokens.validate(token, now)?;
        self.users
            .get_by_username(&claims.sub)
            .await
            .map_err(unavailable)?
            .ok_or(AuthError::UserNotFound)
    }

    /// Pass an admin through unchanged; reject everyone else.
    pub fn require_admin(user: User) -> Result<User, AuthError> {
        if user.is_admin {
            Ok(user)
        } else {
            Err(AuthError::PermissionDenied)
        }
    }

    /// Rotate the calling admin's username and password.
    ///
    /// Tokens issued to the old username stop resolving once the rename is
    /// stored, because tokens bind the username as their subject.
    pub async fn update_admin_credentials(
        &self,
        admin: &User,
        request: UpdateAdminCredentialsRequest,
    ) -> Result<User, AuthError> {
        if !admin.is_admin {
            return Err(AuthError::PermissionDenied);
        }

        let new_username = request.new_username.trim().to_string();
        if new_username.is_empty() {
            return Err(AuthError::InvalidInput("new username cannot be empty".to_string()));
        }
        if request.new_password.is_empty() {
            return Err(AuthError::InvalidInput("new password cannot be empty".to_string()));
        }

        let password_hash = self
            .hasher
            .hash_password(&request.new_password)
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        self.users
            .update_credentials(&admin.id, &new_username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken(new_username.clone()),
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => unavailable(other),
            })?;

        info!(user_id = %admin.id, "Admin credentials updated");

        Ok(User {
            username: new_username,
            password_hash,
            ..admin.clone()
        })
    }

    /// Create the bootstrap admin if no admin account exists yet.
    ///
    /// Safe to run on every startup. Once any admin exists (including one
    /// whose credentials were rotated), nothing is written. A concurrent cold
    /// start that loses the insert race reports `AlreadyPresent`.
    pub async fn ensure_bootstrap_admin(
        &self,
        admin: &BootstrapAdmin,
    ) -> Result<BootstrapOutcome, AuthError> {
        if let Some(existing) = self.users.find_admin().await.map_err(unavailable)? {
            debug!(username = %existing.username, "Admin account already present");
            return Ok(BootstrapOutcome::AlreadyPresent {
                username: existing.username,
            });
        }

        let username = admin.username.trim().to_string();
        if let Some(existing) = self
            .users
            .get_by_username(&username)
            .await
            .map_err(unavailable)?
        {
            warn!(username = %existing.username, "Bootstrap admin username belongs to a standard user");
            return Err(AuthError::UsernameTaken(existing.username));
        }

        let password_hash = self
            .hasher
            .hash_password(admin.password.expose_secret())
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let user = User {
            id: UserId::new(),
            username: username.clone(),
            email: None,
            password_hash,
            is_admin: true,
            created_at: Utc::now(),
        };

        match self.users.create(&user).await {
            Ok(user) => {
                info!(username = %user.username, "Bootstrap admin created");
                Ok(BootstrapOutcome::Created {
                    username: user.username,
                })
            }
            Err(RepositoryError::Conflict(_)) => {
                debug!(username = %username, "Bootstrap admin created concurrently");
                Ok(BootstrapOutcome::AlreadyPresent { username })
            }
            Err(other) => Err(unavailable(other)),
        }
    }
}
