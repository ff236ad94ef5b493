//!
//! # Auth Orchestrator
//!
//! `AuthService` sequences the credential flows: login, access-token refresh,
//! the three-step password reset, and authenticated password change. It owns
//! no I/O of its own; storage goes through [`CredentialStore`] and mail
//! through [`Mailer`], so every flow runs unchanged against fakes in tests.

use std::sync::Arc;

use crate::auth::code::generate_reset_code;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::store::CredentialStore;
use crate::auth::token::TokenKeys;
use crate::error::AppError;
use crate::mail::{reset_code_body, Mailer, RESET_CODE_SUBJECT};
use crate::models::{User, UserRole};

/// Tokens minted for a successfully authenticated account.
pub struct TokenPair {
    pub user_id: i32,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    mailer: Arc<dyn Mailer>,
    keys: TokenKeys,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, mailer: Arc<dyn Mailer>, keys: TokenKeys) -> Self {
        Self { store, mailer, keys }
    }

    /// Verifies the password for the account and mints a fresh token pair.
    ///
    /// An unknown email and a wrong password fail identically, so the
    /// response never reveals whether the account exists. Storage faults are
    /// not folded into that message; they surface as 500s.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let user = match self.store.find_by_email(email).await? {
            Some(user) => user,
            None => {
                log::warn!("login attempt for unknown email");
                return Err(AppError::Unauthorized("Invalid credentials".into()));
            }
        };

        if !verify_password(password, &user.password_hash)? {
            log::warn!("login failed for user {}: password mismatch", user.id);
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }

        self.issue_pair(&user)
    }

    /// Creates an account and logs it in, in one step.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<TokenPair, AppError> {
        if self.store.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password(password)?;
        let user = self.store.create_user(name, email, &password_hash, role).await?;
        log::info!("registered user {} with role {:?}", user.id, user.role);

        self.issue_pair(&user)
    }

    /// Exchanges a valid refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated and there is no server-side
    /// session to consult: possession of an unexpired refresh token is the
    /// whole credential. Every verification failure collapses to one message.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AppError> {
        let claims = self.keys.verify_refresh(refresh_token).map_err(|err| {
            log::warn!("refresh token rejected: {}", err);
            AppError::Unauthorized("Invalid or expired refresh token".into())
        })?;

        self.keys.issue_access(claims.id, &claims.email, claims.role)
    }

    /// Step one of the reset flow: generate a code, persist it, email it.
    ///
    /// The code is stored before the mail goes out. If delivery fails the
    /// row is left behind and simply expires; the caller sees the failure
    /// and can retry, which stores another code.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let code = generate_reset_code();
        self.store.insert_reset_code(&user.email, &code).await?;

        self.mailer
            .send(&user.email, RESET_CODE_SUBJECT, &reset_code_body(&code))
            .await?;

        log::info!("reset code issued for user {}", user.id);
        Ok(())
    }

    /// Step two: check that the submitted code exists for the email and has
    /// not expired. The code is not consumed here; it stays valid until it
    /// expires or a reset deletes it.
    pub async fn confirm_reset_code(&self, email: &str, code: &str) -> Result<(), AppError> {
        match self.store.find_valid_reset_code(email, code).await? {
            Some(_) => Ok(()),
            None => Err(AppError::BadRequest("Invalid or expired code".into())),
        }
    }

    /// Step three: replace the password and clear the email's reset codes.
    ///
    /// This trusts that step two already happened; it does not re-demand the
    /// code. Code cleanup is best-effort: once the new hash is written, a
    /// cleanup failure is logged but the reset still reports success.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), AppError> {
        if self.store.find_by_email(email).await?.is_none() {
            return Err(AppError::NotFound("User not found".into()));
        }

        let password_hash = hash_password(new_password)?;
        if !self.store.update_password_by_email(email, &password_hash).await? {
            return Err(AppError::NotFound("User not found".into()));
        }

        if let Err(err) = self.store.delete_reset_codes(email).await {
            log::warn!("failed to clear reset codes after password reset: {}", err);
        }

        Ok(())
    }

    /// Replaces the password of an authenticated account after re-verifying
    /// the current one. Nothing is written unless the old password matches.
    pub async fn change_password(
        &self,
        user_id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if !verify_password(old_password, &user.password_hash)? {
            return Err(AppError::BadRequest("Old password is incorrect".into()));
        }

        let password_hash = hash_password(new_password)?;
        if !self.store.update_password_by_id(user.id, &password_hash).await? {
            return Err(AppError::NotFound("User not found".into()));
        }

        log::info!("password changed for user {}", user.id);
        Ok(())
    }

    fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            user_id: user.id,
            access_token: self.keys.issue_access(user.id, &user.email, user.role)?,
            refresh_token: self.keys.issue_refresh(user.id, &user.email, user.role)?,
        })
    }
}
