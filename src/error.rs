//!
//! # Error Handling
//!
//! Defines `AppError`, the single error type used by every layer of the
//! service, from storage to HTTP handlers.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers can
//! return `Result<_, AppError>` and have failures rendered as JSON bodies of
//! the form `{"error": "..."}` with the matching status code. `From`
//! implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error` and `bcrypt::BcryptError` keep the `?`
//! operator usable throughout.
//!
//! Infrastructure faults (database, hashing, signing) keep their cause in the
//! variant for logging, but the HTTP body never echoes it. Authentication
//! failures carry short, fixed messages that do not reveal whether an account
//! exists.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// All failure modes the service can report.
///
/// Each variant carries a message; for the client-facing variants the message
/// is sent verbatim in the JSON body.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401).
    Unauthorized(String),
    /// The request was well-formed JSON but semantically unacceptable (HTTP 400).
    BadRequest(String),
    /// The referenced account or record does not exist (HTTP 404).
    NotFound(String),
    /// The request conflicts with existing state, e.g. a taken email (HTTP 409).
    Conflict(String),
    /// An internal operation failed (HTTP 500). The message is a stable
    /// description, never a low-level cause.
    InternalServerError(String),
    /// A database operation failed (HTTP 500). The message holds the `sqlx`
    /// detail for logs; the client only sees a generic body.
    DatabaseError(String),
    /// Input validation failed (HTTP 422). Wraps `validator` errors.
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            // The sqlx detail goes to the log, not over the wire.
            AppError::DatabaseError(msg) => {
                log::error!("database error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
        }
    }
}

/// `sqlx::Error::RowNotFound` becomes `NotFound`; everything else is an
/// infrastructure fault and stays a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// The detailed validation messages are preserved for the 422 body.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Token verification failures. An expired token is reported distinctly;
/// every other kind (bad signature, malformed payload, missing claim)
/// collapses to the same message.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        match error.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Unauthorized("Token has expired".into())
            }
            _ => AppError::Unauthorized("Invalid token".into()),
        }
    }
}

/// Hashing failures are internal faults; the bcrypt cause is logged here and
/// not echoed to the client.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        log::error!("bcrypt failure: {}", error);
        AppError::InternalServerError("Password processing failed".into())
    }
}
