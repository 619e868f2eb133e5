use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use fintrack_ai::{GeminiClient, RetryPolicy, StatementExtractor};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::prelude::*;

mod auth;
mod config;
mod database;
mod errors;
mod handlers;
mod helpers;

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Hello World"
    }))
}

#[get("/health")]
async fn health(db: web::Data<Arc<database::Database>>) -> impl Responder {
    let conn = db.async_connection.lock().await;
    match conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)) {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(_) => HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        })),
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("fintrack-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Load config
    let (config, config_path) = config::ApiConfig::load().expect("Failed to load config");
    tracing::info!("Loaded config from {:?}", config_path);

    // Initialize database
    let db = helpers::database::initialize_database(&config).expect("Failed to initialize database");

    // Get server config or use defaults
    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 5000)
    };

    tracing::info!("Server will listen on {}:{}", host, port);

    // Auth keys from config
    let auth_config = config.auth.clone().unwrap_or_default();
    let auth_keys = auth::AuthKeys::new(&auth_config.secret_key, auth_config.token_expiry_secs);

    // AI extraction client; the key is injected here, never read from a
    // global by the pipeline
    let ai_config = config.ai.clone().unwrap_or_default();
    if ai_config.gemini_api_key.is_none() {
        tracing::warn!("No gemini_api_key configured; statement uploads will fail");
    }
    let client = Arc::new(GeminiClient::new(
        ai_config.gemini_api_key.clone().unwrap_or_default(),
        ai_config.model.clone(),
    ));
    let extractor = Arc::new(StatementExtractor::new(
        client,
        RetryPolicy {
            max_attempts: ai_config.max_attempts,
            delay: Duration::from_millis(ai_config.retry_delay_ms),
        },
    ));

    println!("Starting server on {}:{}", host, port);

    let server_config = config.clone();
    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if let Some(cors_config) = &server_config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(auth_keys.clone()))
            .app_data(web::Data::new(extractor.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .service(hello)
            .service(health)
            .route("/api/users/register", web::post().to(handlers::users::register))
            .route("/api/users/login", web::post().to(handlers::users::login))
            .route(
                "/api/transactions/upload-statement",
                web::post().to(handlers::transactions::upload_statement),
            )
            .route("/api/transactions", web::get().to(handlers::transactions::list_transactions))
            .route(
                "/api/transactions/{id}",
                web::get().to(handlers::transactions::get_transaction),
            )
            .route(
                "/api/transactions/{id}",
                web::put().to(handlers::transactions::update_transaction),
            )
            .route(
                "/api/transactions/{id}",
                web::delete().to(handlers::transactions::delete_transaction),
            )
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        handle.stop(true).await;
    });

    server.await
}
