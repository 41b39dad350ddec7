use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use librairie_api::bootstrap::{ensure_admin, AdminSeed};
use librairie_api::config::ServerConfig;
use librairie_api::router::build_app_router;
use librairie_api::state::AppState;
use librairie_api::storage::UploadStore;
use librairie_events::{EmailConfig, LogMailer, Mailer, SmtpMailer};
use librairie_payment::{DisabledGateway, FedaPayClient, FedaPayConfig, PaymentGateway};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "librairie_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = librairie_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    librairie_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    librairie_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    if let Some(seed) = AdminSeed::from_env() {
        let created = ensure_admin(&pool, &seed)
            .await
            .expect("Failed to bootstrap the administrator account");
        tracing::info!(created, email = %seed.email, "Administrator bootstrap checked");
    }

    // --- Uploads ---
    let uploads = UploadStore::new(config.upload_dir.clone());
    uploads
        .ensure_dirs()
        .await
        .expect("Failed to create upload directories");
    tracing::info!(root = %uploads.root().display(), "Upload store ready");

    // --- Email ---
    let mailer: Arc<dyn Mailer> = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(host = %email_config.smtp_host, "SMTP delivery enabled");
            Arc::new(SmtpMailer::new(email_config).expect("Invalid SMTP configuration"))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    // --- Payment gateway ---
    let payments: Arc<dyn PaymentGateway> = match FedaPayConfig::from_env() {
        Some(fedapay) => {
            tracing::info!(base_url = %fedapay.base_url, "Payment gateway configured");
            Arc::new(FedaPayClient::new(fedapay))
        }
        None => {
            tracing::warn!("FEDAPAY_SECRET_KEY not set, payments are disabled");
            Arc::new(DisabledGateway)
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer,
        payments,
        uploads: Arc::new(uploads),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
