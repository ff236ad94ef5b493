use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the role of an account.
/// Corresponds to the `user_role` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular account.
    User,
    /// Administrative account.
    Admin,
    /// Top-level administrative account.
    SuperAdmin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

/// An account credential record as stored in the `users` table.
///
/// The password is only ever held in hashed form; there is no accessor that
/// exposes it outside the crate's verification path.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// bcrypt digest, never the plaintext.
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
