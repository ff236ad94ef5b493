use std::env;

/// Signing material and lifetimes for the two token families.
///
/// Access and refresh tokens are signed with separate secrets so that a
/// token minted for one purpose can never pass verification for the other.
#[derive(Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// SMTP relay settings for outbound mail (password-reset codes).
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub environment: String,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let email_user = env::var("EMAIL_USER").expect("EMAIL_USER must be set");

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            environment: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            jwt: JwtConfig {
                access_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
                refresh_secret: env::var("JWT_REFRESH_SECRET")
                    .expect("JWT_REFRESH_SECRET must be set"),
                access_ttl_minutes: env::var("JWT_ACCESS_TTL_MINUTES")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .expect("JWT_ACCESS_TTL_MINUTES must be a number"),
                // 30 days. Refresh tokens are stateless, so the lifetime is
                // the only thing bounding how long a session can be renewed.
                refresh_ttl_minutes: env::var("JWT_REFRESH_TTL_MINUTES")
                    .unwrap_or_else(|_| "43200".to_string())
                    .parse()
                    .expect("JWT_REFRESH_TTL_MINUTES must be a number"),
            },
            smtp: SmtpConfig {
                host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "465".to_string())
                    .parse()
                    .expect("SMTP_PORT must be a number"),
                password: env::var("EMAIL_PASSWORD").expect("EMAIL_PASSWORD must be set"),
                from: env::var("MAIL_FROM").unwrap_or_else(|_| email_user.clone()),
                username: email_user,
            },
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    /// Controls the `Secure` flag on the refresh-token cookie.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
