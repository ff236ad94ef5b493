pub mod code;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserRole;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use service::{AuthService, TokenPair};
pub use store::{CredentialStore, PgCredentialStore};
pub use token::{Claims, TokenKeys};

/// Payload for a login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email address.
    #[validate(email)]
    pub email: String,
    /// Account password, at least 6 characters.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Payload for a new account registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name, 1 to 100 characters.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Email address for the new account.
    #[validate(email)]
    pub email: String,
    /// Password for the new account, at least 6 characters.
    #[validate(length(min = 6))]
    pub password: String,
    /// Role for the new account; defaults to `user` when omitted.
    pub role: Option<UserRole>,
}

/// Payload for exchanging a refresh token. The token normally travels in the
/// `refreshToken` cookie; this body field is a fallback for clients that do
/// not hold cookies.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

/// Payload requesting that a reset code be emailed to the account.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email)]
    pub email: String,
}

/// Payload checking an emailed reset code against the stored one.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(email)]
    pub email: String,
    /// The six-digit code from the email.
    #[validate(length(equal = 6))]
    pub code: String,
}

/// Payload completing a password reset.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
    /// Replacement password, at least 6 characters.
    #[validate(length(min = 6))]
    pub new_password: String,
}

/// Payload for an authenticated password change.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// The current password; must match before anything is written.
    pub old_password: String,
    /// Replacement password, at least 6 characters.
    #[validate(length(min = 6))]
    pub new_password: String,
}

/// Response after successful authentication (login or registration).
///
/// Carries only the access token; the refresh token travels separately in
/// the `refreshToken` cookie.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    /// The unique identifier of the authenticated account.
    pub user_id: i32,
}

/// Response to a successful refresh.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Plain confirmation body used by the reset and change flows.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
