#![allow(dead_code)]
//! Shared fixtures for the integration tests: an in-memory
//! `CredentialStore`, a recording `Mailer`, and a ready-to-wire
//! `AuthService`. The HTTP tests exercise the full middleware and handler
//! stack without needing Postgres or an SMTP relay.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use async_trait::async_trait;
use chrono::{Duration, Utc};

use authforge::auth::{AuthService, CredentialStore, TokenKeys};
use authforge::config::{Config, JwtConfig, SmtpConfig};
use authforge::error::AppError;
use authforge::mail::Mailer;
use authforge::models::reset_code::RESET_CODE_TTL_MINUTES;
use authforge::models::{ResetCode, User, UserRole};

/// In-memory credential store with the same observable behavior as the
/// Postgres one, plus switches for simulating outages and expiry.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    reset_codes: Mutex<Vec<ResetCode>>,
    next_user_id: AtomicI32,
    next_code_id: AtomicI32,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// While offline, every store call fails the way a dead pool would.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Backdates every code stored for `email` past its expiry, standing in
    /// for the passage of wall-clock time.
    pub fn expire_codes(&self, email: &str) {
        let mut codes = self.reset_codes.lock().unwrap();
        for code in codes.iter_mut().filter(|c| c.email == email) {
            code.expires_at = Utc::now() - Duration::minutes(1);
        }
    }

    pub fn stored_code_count(&self, email: &str) -> usize {
        self.reset_codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.email == email)
            .count()
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(AppError::DatabaseError("storage offline".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.check_online()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        self.check_online()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        self.check_online()?;
        let now = Utc::now();
        let user = User {
            id: self.next_user_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update_password_by_id(
        &self,
        id: i32,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        self.check_online()?;
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_password_by_email(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        self.check_online()?;
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.email == email) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_reset_code(&self, email: &str, code: &str) -> Result<(), AppError> {
        self.check_online()?;
        let now = Utc::now();
        self.reset_codes.lock().unwrap().push(ResetCode {
            id: self.next_code_id.fetch_add(1, Ordering::SeqCst) + 1,
            email: email.to_string(),
            code: code.to_string(),
            expires_at: now + Duration::minutes(RESET_CODE_TTL_MINUTES),
            created_at: now,
        });
        Ok(())
    }

    async fn find_valid_reset_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<ResetCode>, AppError> {
        self.check_online()?;
        let now = Utc::now();
        let codes = self.reset_codes.lock().unwrap();
        Ok(codes
            .iter()
            .find(|c| c.email == email && c.code == code && c.is_valid_at(now))
            .cloned())
    }

    async fn delete_reset_codes(&self, email: &str) -> Result<u64, AppError> {
        self.check_online()?;
        let mut codes = self.reset_codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|c| c.email != email);
        Ok((before - codes.len()) as u64)
    }
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records outgoing mail instead of delivering it.
#[derive(Default)]
pub struct MockMailer {
    sent: Mutex<Vec<SentMail>>,
    failing: AtomicBool,
}

impl MockMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// While failing, sends error without recording anything.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_mail(&self) -> Option<SentMail> {
        self.sent.lock().unwrap().last().cloned()
    }

    /// The six-digit code carried by the most recent message.
    pub fn last_code(&self) -> Option<String> {
        self.last_mail()
            .map(|mail| mail.body.chars().filter(|c| c.is_ascii_digit()).collect())
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::InternalServerError("Failed to send email".into()));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<MockMailer>,
    pub service: AuthService,
    pub keys: TokenKeys,
    pub config: Config,
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused-in-tests".to_string(),
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        environment: "test".to_string(),
        jwt: JwtConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_ttl_minutes: 60,
            refresh_ttl_minutes: 43200,
        },
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            username: "unused".to_string(),
            password: "unused".to_string(),
            from: "AuthForge <noreply@example.com>".to_string(),
        },
    }
}

pub fn setup() -> TestContext {
    build(test_config())
}

/// Same wiring as [`setup`] but under the production environment name, for
/// pinning production-only behavior such as the `Secure` cookie flag.
pub fn setup_production() -> TestContext {
    let mut config = test_config();
    config.environment = "production".to_string();
    build(config)
}

fn build(config: Config) -> TestContext {
    let keys = TokenKeys::from_config(&config.jwt);
    let store = MemoryStore::new();
    let mailer = MockMailer::new();
    let service = AuthService::new(store.clone(), mailer.clone(), keys.clone());
    TestContext {
        store,
        mailer,
        service,
        keys,
        config,
    }
}

/// Pulls the refresh-token value out of a raw `Set-Cookie` header.
pub fn cookie_value(set_cookie: &str) -> Option<String> {
    set_cookie
        .split(';')
        .next()?
        .strip_prefix("refreshToken=")
        .map(|value| value.to_string())
}

/// Drives `req` through `app` like [`actix_web::test::call_service`], but a
/// service-level `Err` — how `AuthMiddleware` rejects — is rendered into its
/// HTTP response via `ResponseError`, as the real dispatcher does, instead of
/// panicking the test.
pub async fn call_service_rendered<S, R, B>(app: &S, req: R) -> ServiceResponse<BoxBody>
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody + 'static,
{
    match app.call(req).await {
        Ok(resp) => resp.map_into_boxed_body(),
        Err(err) => ServiceResponse::new(
            actix_web::test::TestRequest::default().to_http_request(),
            err.error_response(),
        ),
    }
}
