use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use referral_service::{
    config::Config,
    db::{create_pool, run_migrations},
    handlers,
    services::SignupService,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    tracing::info!("Starting referral-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_pool = create_pool(&config.database.url, config.database.max_connections)
        .await
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("Failed to create database pool: {}", e),
            )
        })?;

    tracing::info!(
        "Database pool created with {} max connections",
        config.database.max_connections
    );

    // Run migrations unless explicitly skipped.
    let run_migrations_env = std::env::var("RUN_MIGRATIONS").unwrap_or_else(|_| "true".into());
    if run_migrations_env != "false" {
        tracing::info!("Running database migrations...");
        run_migrations(&db_pool)
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Migrations failed: {}", e)))?;
        tracing::info!("Database migrations completed");
    } else {
        tracing::info!("Skipping database migrations (RUN_MIGRATIONS=false)");
    }

    let signup_service = SignupService::new(db_pool.clone(), &config.signup);

    let server_config = config.clone();
    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in server_config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(signup_service.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/health", web::get().to(handlers::health_check))
            .route("/health/ready", web::get().to(handlers::readiness_check))
            .service(
                web::scope("/api/v1")
                    .route("/signups", web::post().to(handlers::submit_signup))
                    .route("/search", web::get().to(handlers::search_users))
                    .route("/users/bulk", web::post().to(handlers::bulk_create))
                    .route("/users/{identifier}", web::get().to(handlers::lookup_user))
                    .route(
                        "/users/{identifier}",
                        web::patch().to(handlers::update_profile),
                    )
                    .service(
                        web::scope("/pool")
                            .route(
                                "/accounts",
                                web::post().to(handlers::create_reserved_account),
                            )
                            .route("/accounts", web::get().to(handlers::list_reserved_accounts)),
                    )
                    .service(
                        web::scope("/blacklist")
                            .route("", web::post().to(handlers::add_blacklist_entry))
                            .route("", web::get().to(handlers::list_blacklist))
                            .route("/{id}", web::delete().to(handlers::remove_blacklist_entry)),
                    ),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
