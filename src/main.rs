//! # Pet Medical Records Service
//!
//! Main entry point for the pet medical record service.
//! Wires configuration, telemetry, the sqlite stores and the HTTP routes.

pub mod api;
pub mod config;
pub mod consts;
pub mod errors;
pub mod front;
pub mod logger;
pub mod metric;
pub mod models;
pub mod repo;
pub mod utils;

use logfire::config::{MetricsOptions, SendToLogfire};
use ntex::web;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};

use crate::repo::{MedicalRecordRepo, sqlite};

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::AppConfig::load()?;

    // Initialize logging and metrics
    let mut logfire_config = logfire::configure()
        .install_panic_handler()
        .with_metrics(Some(MetricsOptions::default()))
        .send_to_logfire(SendToLogfire::IfTokenPresent);
    if let Some(token) = &app_config.logfire_token {
        logfire_config = logfire_config.with_token(token);
    }
    let shutdown_handler = logfire_config.finish()?;

    logger::setup_simple_logger()?;

    // Initialize database connection pools
    let medical_repo = sqlite::SqlxSqliteRepo {
        db_pool: utils::setup_sqlite_db_pool(
            &app_config.db_host,
            app_config.db_encryption_key(),
            false,
        )
        .await?,
    };
    medical_repo.ensure_schema().await?;

    let pet_directory = sqlite::SqlxSqlitePetDirectory {
        db_pool: utils::setup_sqlite_db_pool(
            &app_config.pet_db_host,
            app_config.db_encryption_key(),
            true,
        )
        .await?,
    };

    configure_and_run_server(&app_config, medical_repo, pet_directory).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor(
    app_config: &config::AppConfig,
) -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Creates application state from the provided stores
fn create_app_state(
    jwt_secret: &str,
    medical_repo: sqlite::SqlxSqliteRepo,
    pet_directory: sqlite::SqlxSqlitePetDirectory,
) -> front::AppState {
    front::AppState {
        jwt_secret: jwt_secret.to_string(),
        medical_repo: Box::new(medical_repo),
        pet_directory: Box::new(pet_directory),
    }
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(
    app_config: &config::AppConfig,
    medical_repo: sqlite::SqlxSqliteRepo,
    pet_directory: sqlite::SqlxSqlitePetDirectory,
) -> anyhow::Result<()> {
    let jwt_secret = app_config.jwt_secret.clone();

    let server = web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .state(create_app_state(
                &jwt_secret,
                medical_repo.clone(),
                pet_directory.clone(),
            ))
            .configure(front::routes::medical)
            .service(front::server::health)
            .default_service(web::route().to(front::server::serve_not_found))
    });

    let server_addr = app_config.server_addr();
    logfire::info!(
        "Serving pet medical records on {host}:{port}",
        host = server_addr.0.clone(),
        port = i64::from(server_addr.1)
    );

    let bound_server = if app_config.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor(app_config)?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
