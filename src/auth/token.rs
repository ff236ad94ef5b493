use crate::config::JwtConfig;
use crate::error::AppError;
use crate::models::UserRole;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by every token this service mints.
///
/// All four fields are required on decode; a token missing any of them fails
/// verification no matter how it was signed.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The account's unique identifier.
    pub id: i32,
    /// The account's email at issue time.
    pub email: String,
    /// The account's role at issue time.
    pub role: UserRole,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Signing and verification keys for both token families.
///
/// Access and refresh tokens use separate secrets. That keeps the families
/// mutually unverifiable: an access token presented to `verify_refresh` (or
/// vice versa) fails with a signature error, with no claim sniffing needed.
#[derive(Clone)]
pub struct TokenKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_minutes: i64,
    refresh_ttl_minutes: i64,
}

impl TokenKeys {
    pub fn from_config(jwt: &JwtConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(jwt.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(jwt.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(jwt.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(jwt.refresh_secret.as_bytes()),
            access_ttl_minutes: jwt.access_ttl_minutes,
            refresh_ttl_minutes: jwt.refresh_ttl_minutes,
        }
    }

    /// Issues a short-lived access token for the given account.
    pub fn issue_access(&self, id: i32, email: &str, role: UserRole) -> Result<String, AppError> {
        self.sign(id, email, role, &self.access_encoding, self.access_ttl_minutes)
    }

    /// Issues a long-lived refresh token for the given account.
    pub fn issue_refresh(&self, id: i32, email: &str, role: UserRole) -> Result<String, AppError> {
        self.sign(id, email, role, &self.refresh_encoding, self.refresh_ttl_minutes)
    }

    /// Verifies an access token and returns its claims.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        Self::verify(token, &self.access_decoding)
    }

    /// Verifies a refresh token and returns its claims.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AppError> {
        Self::verify(token, &self.refresh_decoding)
    }

    fn sign(
        &self,
        id: i32,
        email: &str,
        role: UserRole,
        key: &EncodingKey,
        ttl_minutes: i64,
    ) -> Result<String, AppError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(chrono::Duration::minutes(ttl_minutes))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            id,
            email: email.to_owned(),
            role,
            exp: expiration,
        };

        encode(&Header::default(), &claims, key).map_err(|e| {
            log::error!("failed to sign token: {}", e);
            AppError::InternalServerError("Failed to generate token".into())
        })
    }

    fn verify(token: &str, key: &DecodingKey) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        // A token is dead exactly at `exp`, not some grace period later.
        validation.leeway = 0;

        let claims = decode::<Claims>(token, key, &validation)?.claims;

        // decode() only fails once `exp` is strictly past. Validity is
        // `now < exp`, so the boundary second itself is rejected, the same
        // clock rule reset codes use.
        if claims.exp <= chrono::Utc::now().timestamp() as usize {
            return Err(AppError::Unauthorized("Token has expired".into()));
        }

        Ok(claims)
    }
}
