//!
//! # Credential Storage
//!
//! `CredentialStore` is the persistence seam for account records and reset
//! codes. Handlers and the orchestrator never touch the pool directly; they
//! go through this trait, which keeps the auth flows testable against an
//! in-memory implementation.
//!
//! Lookup misses are `Ok(None)` / `Ok(false)`; an `Err` always means the
//! backend itself failed, so callers can tell "no such account" apart from
//! "storage is down".

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::reset_code::RESET_CODE_TTL_MINUTES;
use crate::models::{ResetCode, User, UserRole};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, AppError>;

    /// Returns `false` when no row matched the id.
    async fn update_password_by_id(&self, id: i32, password_hash: &str)
        -> Result<bool, AppError>;

    /// Returns `false` when no row matched the email.
    async fn update_password_by_email(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, AppError>;

    /// Persists a fresh code with the standard expiry window. Earlier codes
    /// for the same email are left in place and stay redeemable until they
    /// expire on their own.
    async fn insert_reset_code(&self, email: &str, code: &str) -> Result<(), AppError>;

    /// Looks up a code that matches the email exactly and has not expired.
    async fn find_valid_reset_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<ResetCode>, AppError>;

    /// Deletes every code stored for the email, returning how many went.
    async fn delete_reset_codes(&self, email: &str) -> Result<u64, AppError>;
}

/// Postgres-backed store used by the running service.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, password_hash, role, created_at, updated_at",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_password_by_id(
        &self,
        id: i32,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_password_by_email(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE email = $2")
                .bind(password_hash)
                .bind(email)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_reset_code(&self, email: &str, code: &str) -> Result<(), AppError> {
        let expires_at = Utc::now() + Duration::minutes(RESET_CODE_TTL_MINUTES);

        sqlx::query("INSERT INTO password_resets (email, code, expires_at) VALUES ($1, $2, $3)")
            .bind(email)
            .bind(code)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_valid_reset_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<ResetCode>, AppError> {
        let row = sqlx::query_as::<_, ResetCode>(
            "SELECT id, email, code, expires_at, created_at \
             FROM password_resets WHERE email = $1 AND code = $2 AND expires_at > $3",
        )
        .bind(email)
        .bind(code)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_reset_codes(&self, email: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM password_resets WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
