use crate::error::AppError;
use bcrypt::{hash, verify};

/// bcrypt work factor. Existing digests were produced at this cost, so keep
/// it stable unless a migration rehashes on login.
const BCRYPT_COST: u32 = 12;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, BCRYPT_COST)?)
}

/// Returns `Ok(false)` for a mismatched password; an `Err` only ever means
/// the digest itself was unusable.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    Ok(verify(password, hashed_password)?)
}
