pub mod auth;
pub mod health;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::refresh_token)
            .service(auth::verify_email)
            .service(auth::verify_code)
            .service(auth::reset_password)
            .service(auth::change_password),
    );
}
