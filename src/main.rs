use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use authforge::auth::{AuthMiddleware, AuthService, PgCredentialStore, TokenKeys};
use authforge::config::Config;
use authforge::mail::SmtpMailer;
use authforge::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let keys = TokenKeys::from_config(&config.jwt);
    let mailer = SmtpMailer::from_config(&config.smtp).expect("Failed to configure SMTP mailer");
    let service = AuthService::new(
        Arc::new(PgCredentialStore::new(pool.clone())),
        Arc::new(mailer),
        keys.clone(),
    );

    let bind_addr = (config.server_host.clone(), config.server_port);
    println!("Starting AuthForge server at {}", config.server_url());

    let result = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(service.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(keys.clone()))
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await;

    // Drain connections before exiting so in-flight writes finish cleanly.
    pool.close().await;
    result
}
