use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::config::ServerSettings;
use crate::storage::UserStore;

pub mod error;
pub mod routes;

/// Server state
pub struct AppState {
    pub store: UserStore,
}

/// Build the application router around an already-open store
pub fn build_router(store: UserStore) -> Router {
    let state = Arc::new(AppState { store });

    let api = Router::new()
        .route("/users", get(routes::list_users).post(routes::create_user))
        .route("/users/{id}", get(routes::get_user));

    Router::new()
        .route("/", get(routes::hello))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(settings: ServerSettings) -> anyhow::Result<()> {
    crate::config::ensure_db_dir(&settings.database)?;
    // Schema creation failure aborts startup.
    let store = UserStore::open(&settings.database)?;
    tracing::info!("Using database {}", settings.database.display());

    let app = build_router(store.clone());

    let addr = SocketAddr::new(settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down");
    store.close()?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
