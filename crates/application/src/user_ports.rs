use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinica_core::{AppResult, Role, UserId};
use clinica_domain::PermissionSet;

use crate::{Page, RecordSearch, ScopedQuery};

/// User account row including the credential hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Canonical email address.
    pub email: String,
    /// Global role.
    pub role: Role,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// User projection returned by clinic member listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Canonical email address.
    pub email: String,
    /// Global role.
    pub role: Role,
    /// Permissions granted in the listed clinic.
    pub permissions: PermissionSet,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields required to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Canonical email address.
    pub email: String,
    /// Global role.
    pub role: Role,
    /// Argon2id password hash.
    pub password_hash: String,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Finds a user by canonical email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Creates a user. Fails with `Conflict` when the email is taken.
    async fn create(&self, user: NewUser) -> AppResult<UserRecord>;

    /// Updates name, email and role.
    async fn update_profile(
        &self,
        user_id: UserId,
        name: &str,
        email: &str,
        role: Role,
    ) -> AppResult<()>;

    /// Updates the password hash.
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()>;

    /// Lists members of the scoped clinic.
    ///
    /// The search term matches name or email.
    async fn search_members(
        &self,
        query: ScopedQuery<RecordSearch>,
    ) -> AppResult<Page<UserSummary>>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
