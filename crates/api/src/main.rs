use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ghostmonk_api::config::ServerConfig;
use ghostmonk_api::router::build_app_router;
use ghostmonk_api::state::AppState;
use ghostmonk_core::signature::generate_secret;
use ghostmonk_db::repositories::WebhookRepo;
use ghostmonk_engine::executor::Executor;
use ghostmonk_engine::ingest::Ingest;
use ghostmonk_engine::scheduler::Scheduler;
use ghostmonk_listmonk::ListmonkClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghostmonk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = ghostmonk_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    ghostmonk_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    ghostmonk_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Webhook configuration ---
    // First boot creates the row with a fresh secret; later boots reuse it.
    let webhook = WebhookRepo::ensure(&pool, &config.webhook_endpoint, &generate_secret())
        .await
        .expect("Failed to ensure webhook configuration");
    tracing::info!(endpoint = %webhook.endpoint, "Webhook configuration ready");

    // --- listmonk client ---
    let mailing_list = Arc::new(ListmonkClient::new(
        config.listmonk.url.clone(),
        config.listmonk.username.clone(),
        config.listmonk.password.clone(),
    ));

    // --- Scheduler ---
    let executor = Arc::new(Executor::new(pool.clone(), mailing_list.clone()));
    let scheduler = Scheduler::with_settings(
        pool.clone(),
        executor,
        Duration::from_millis(config.scheduler_poll_ms),
        config.scheduler_concurrency,
    );
    let scheduler_cancel = tokio_util::sync::CancellationToken::new();
    let scheduler_cancel_clone = scheduler_cancel.clone();
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(scheduler_cancel_clone).await;
    });
    tracing::info!("Scheduler started");

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        ingest: Ingest::new(pool),
    };

    // --- Router ---
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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    scheduler_cancel.cancel();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        scheduler_handle,
    )
    .await;
    tracing::info!("Scheduler stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
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
