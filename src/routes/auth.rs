use crate::{
    auth::{
        AuthResponse, AuthService, AuthenticatedUser, ChangePasswordRequest, LoginRequest,
        MessageResponse, RefreshResponse, RefreshTokenRequest, RegisterRequest,
        ResetPasswordRequest, VerifyCodeRequest, VerifyEmailRequest,
    },
    config::Config,
    error::AppError,
};
use actix_web::{cookie::Cookie, post, web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

/// Name of the cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Builds the refresh-token cookie. `HttpOnly` always; `Secure` only in
/// production so local HTTP development keeps working.
fn refresh_cookie(config: &Config, token: String) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(config.is_production())
        .finish()
}

/// Register a new account
///
/// Creates the account and logs it in: the response carries the access token
/// and the refresh token is set as a cookie.
#[post("/register")]
pub async fn register(
    service: web::Data<AuthService>,
    config: web::Data<Config>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let register_data = register_data.into_inner();
    let tokens = service
        .register(
            &register_data.name,
            &register_data.email,
            &register_data.password,
            register_data.role.unwrap_or_default(),
        )
        .await?;

    let cookie = refresh_cookie(&config, tokens.refresh_token);
    Ok(HttpResponse::Created().cookie(cookie).json(AuthResponse {
        access_token: tokens.access_token,
        user_id: tokens.user_id,
    }))
}

/// Login
///
/// Authenticates with email and password. Returns the access token in the
/// body and the refresh token in the `refreshToken` cookie.
#[post("/login")]
pub async fn login(
    service: web::Data<AuthService>,
    config: web::Data<Config>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let tokens = service.login(&login_data.email, &login_data.password).await?;

    let cookie = refresh_cookie(&config, tokens.refresh_token);
    Ok(HttpResponse::Ok().cookie(cookie).json(AuthResponse {
        access_token: tokens.access_token,
        user_id: tokens.user_id,
    }))
}

/// Refresh the access token
///
/// Reads the refresh token from the cookie first, then from the body for
/// clients that do not hold cookies. The refresh token itself is not rotated.
#[post("/refresh-token")]
pub async fn refresh_token(
    service: web::Data<AuthService>,
    req: HttpRequest,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> Result<impl Responder, AppError> {
    let token = req
        .cookie(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| body.and_then(|b| b.into_inner().refresh_token));

    let token = token.ok_or_else(|| AppError::BadRequest("Refresh token is required".into()))?;

    let access_token = service.refresh_access_token(&token).await?;
    Ok(HttpResponse::Ok().json(RefreshResponse { access_token }))
}

/// Request a password-reset code
///
/// Emails a six-digit code to the account and stores it with a ten-minute
/// expiry. 404 if no account owns the address.
#[post("/verify-email")]
pub async fn verify_email(
    service: web::Data<AuthService>,
    payload: web::Json<VerifyEmailRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    service.request_password_reset(&payload.email).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Verification code sent successfully".into(),
    }))
}

/// Check a password-reset code
///
/// Confirms the code matches and is still inside its expiry window. The code
/// is not consumed by this check.
#[post("/verify-code")]
pub async fn verify_code(
    service: web::Data<AuthService>,
    payload: web::Json<VerifyCodeRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    service.confirm_reset_code(&payload.email, &payload.code).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Verification code matched successfully".into(),
    }))
}

/// Complete a password reset
///
/// Replaces the account password and clears any stored reset codes for the
/// email.
#[post("/reset-password")]
pub async fn reset_password(
    service: web::Data<AuthService>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    service.reset_password(&payload.email, &payload.new_password).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password reset successfully".into(),
    }))
}

/// Change the password of the authenticated account
///
/// Requires a valid access token and the current password.
#[post("/change-password")]
pub async fn change_password(
    service: web::Data<AuthService>,
    user: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    service
        .change_password(user.0.id, &payload.old_password, &payload.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password changed successfully".into(),
    }))
}
