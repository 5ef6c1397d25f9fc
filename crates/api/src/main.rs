use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use civic_core::appointment::SlotAllocator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use civic_api::background;
use civic_api::config::ServerConfig;
use civic_api::router::build_app_router;
use civic_api::state::AppState;
use civic_api::storage::LocalDocumentStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "civic_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        slot_capacity = config.allocator.capacity,
        horizon_days = config.allocator.horizon_days,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = civic_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    civic_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    civic_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus ---
    let event_bus = Arc::new(civic_events::EventBus::default());
    let dispatcher_handle = tokio::spawn(civic_events::NotificationDispatcher::run(
        pool.clone(),
        event_bus.subscribe(),
    ));
    tracing::info!("Notification dispatcher started");

    // --- Officer performance refresh ---
    let stats_cancel = tokio_util::sync::CancellationToken::new();
    let stats_handle = tokio::spawn(background::officer_stats::run(
        pool.clone(),
        Duration::from_secs(config.officer_stats_interval_secs),
        stats_cancel.clone(),
    ));

    // --- App state ---
    let documents = LocalDocumentStore::new(config.document_storage_dir.clone());
    tracing::info!(dir = %documents.root().display(), "Document storage configured");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        documents: Arc::new(documents),
        allocator: SlotAllocator::new(config.allocator),
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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    stats_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), stats_handle).await;
    tracing::info!("Officer performance refresh stopped");

    // The router (and its state clone) is gone; dropping the last bus handle
    // closes the channel and stops the dispatcher.
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), dispatcher_handle).await;
    tracing::info!("Notification dispatcher stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
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
