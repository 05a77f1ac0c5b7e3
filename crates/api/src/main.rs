//! Gatherly API server binary.

use std::sync::Arc;

use gatherly_api::config::ServerConfig;
use gatherly_api::places::PlacesClient;
use gatherly_api::push::NotificationPush;
use gatherly_api::router::build_app_router;
use gatherly_api::state::AppState;
use gatherly_api::ws::{start_heartbeat, WsManager};
use gatherly_events::EventBus;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present; real environments set variables directly.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatherly_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(ServerConfig::from_env());

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in the environment");
    let pool = gatherly_db::create_pool(&database_url).await?;
    gatherly_db::health_check(&pool).await?;
    gatherly_db::run_migrations(&pool).await?;
    tracing::info!("Database connected and migrations applied");

    let ws_manager = Arc::new(WsManager::new());
    let heartbeat = start_heartbeat(Arc::clone(&ws_manager));

    let event_bus = Arc::new(EventBus::default());
    let push = NotificationPush::new(pool.clone(), Arc::clone(&ws_manager));
    let push_task = tokio::spawn(push.run(event_bus.subscribe()));

    let state = AppState {
        pool,
        config: Arc::clone(&config),
        ws_manager: Arc::clone(&ws_manager),
        event_bus,
        places: PlacesClient::new(config.places.clone()),
    };

    let app = build_app_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down");
    ws_manager.shutdown_all().await;
    heartbeat.abort();
    push_task.abort();

    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
