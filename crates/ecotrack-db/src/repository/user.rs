//! # User Repository
//!
//! The credential store: registration, login checks and the first-run
//! administrator.
//!
//! ## Login
//! ```text
//! authenticate("bob", "pw")
//!      │
//!      ├── no such user ──► verify against a dummy digest ──► None
//!      │
//!      └── row found ─────► argon2 verify
//!                               ├── match    ──► Some(role)
//!                               └── mismatch ──► None
//! ```
//! Unknown user and wrong password are indistinguishable to the caller.

use ecotrack_core::validation::{validate_password, validate_username};
use ecotrack_core::{Role, User, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::password::{hash_password, verify_against_dummy, verify_password};

/// Repository for staff accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Registers a new account.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - username taken; the existing account is untouched
    /// * `DbError::Validation` - empty/oversized username, short password
    pub async fn register(&self, username: &str, password: &str, role: Role) -> DbResult<()> {
        validate_username(username)?;
        validate_password(password)?;

        let digest = hash_password(password)?;

        debug!(username = %username, role = %role, "Registering user");

        sqlx::query("INSERT INTO users (username, password_digest, role) VALUES (?1, ?2, ?3)")
            .bind(username)
            .bind(&digest)
            .bind(role)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("username", username),
                other => other,
            })?;

        info!(username = %username, role = %role, "User registered");
        Ok(())
    }

    /// Returns the user's role when `password` matches, `None` otherwise.
    pub async fn authenticate(&self, username: &str, password: &str) -> DbResult<Option<Role>> {
        let Some(user) = self.get(username).await? else {
            verify_against_dummy(password);
            debug!(username = %username, "Login failed");
            return Ok(None);
        };

        if verify_password(password, &user.password_digest)? {
            debug!(username = %username, role = %user.role, "Login succeeded");
            Ok(Some(user.role))
        } else {
            debug!(username = %username, "Login failed");
            Ok(None)
        }
    }

    /// Gets an account by username.
    pub async fn get(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT username, password_digest, role FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Number of accounts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Makes sure the bootstrap administrator exists.
    ///
    /// Insert-or-ignore: an existing `admin` keeps its password and role.
    /// Returns true when the account was created by this call.
    pub async fn ensure_default_admin(&self) -> DbResult<bool> {
        let digest = hash_password(DEFAULT_ADMIN_PASSWORD)?;

        let result = sqlx::query(
            "INSERT OR IGNORE INTO users (username, password_digest, role) VALUES (?1, ?2, ?3)",
        )
        .bind(DEFAULT_ADMIN_USERNAME)
        .bind(&digest)
        .bind(Role::Admin)
        .execute(&self.pool)
        .await?;

        let created = result.rows_affected() > 0;
        if created {
            warn!(
                username = DEFAULT_ADMIN_USERNAME,
                "Created default administrator with the factory password; change it before going live"
            );
        }
        Ok(created)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    use super::*;

    async fn repo() -> UserRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().users()
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let repo = repo().await;
        repo.register("alice", "s3cret", Role::Sales).await.unwrap();

        assert_eq!(repo.authenticate("alice", "s3cret").await.unwrap(), Some(Role::Sales));
        assert_eq!(repo.authenticate("alice", "S3cret").await.unwrap(), None);
        assert_eq!(repo.authenticate("nobody", "s3cret").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_digest_is_not_plaintext() {
        let repo = repo().await;
        repo.register("alice", "s3cret", Role::Sales).await.unwrap();

        let user = repo.get("alice").await.unwrap().unwrap();
        assert_ne!(user.password_digest, "s3cret");
        assert!(!user.password_digest.contains("s3cret"));
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_original_role() {
        let repo = repo().await;
        repo.register("bob", "pass1", Role::Sales).await.unwrap();

        let err = repo.register("bob", "pass2", Role::Admin).await.unwrap_err();
        assert!(err.is_duplicate());

        assert_eq!(repo.get("bob").await.unwrap().unwrap().role, Role::Sales);
        assert_eq!(repo.authenticate("bob", "pass1").await.unwrap(), Some(Role::Sales));
        assert_eq!(repo.authenticate("bob", "pass2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let repo = repo().await;
        assert!(matches!(
            repo.register("", "1234", Role::Sales).await.unwrap_err(),
            DbError::Validation(_)
        ));
        assert!(matches!(
            repo.register("carol", "12", Role::Sales).await.unwrap_err(),
            DbError::Validation(_)
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_default_admin_is_idempotent() {
        let repo = repo().await;
        assert!(repo.ensure_default_admin().await.unwrap());
        assert!(!repo.ensure_default_admin().await.unwrap());

        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(
            repo.authenticate(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
                .await
                .unwrap(),
            Some(Role::Admin)
        );
    }
}
