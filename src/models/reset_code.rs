use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// How long an emailed reset code stays redeemable.
pub const RESET_CODE_TTL_MINUTES: i64 = 10;

/// A one-time password-reset code as stored in the `password_resets` table.
///
/// Codes are keyed by email, not by user id: the row outlives nothing and is
/// deleted wholesale once the password is reset.
#[derive(Debug, Clone, FromRow)]
pub struct ResetCode {
    pub id: i32,
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ResetCode {
    /// A code is redeemable strictly before `expires_at`; at the boundary it
    /// is already dead.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
