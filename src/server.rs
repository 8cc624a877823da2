use std::sync::Arc;

use axum::middleware;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::{create_pool, migrations};
use crate::error_pages::{error_page_middleware, fallback_handler};
use crate::handlers;
use crate::state::{AppState, Clock};
use crate::storage::{RemoteStore, SqliteStore, TransactionStore};

/// Build the application state and Axum router from a [`Config`].
///
/// The local database is always opened and migrated. When a remote store is
/// configured it becomes the active store and the local one is kept only as
/// the source for migrating on-device records.
pub fn build_app(config: Config) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let db = create_pool(&config.database_path)?;

    {
        let conn = db.get()?;
        migrations::run_migrations(&conn, &config.migrations_path)?;
    }

    let local = Arc::new(SqliteStore::new(db));
    let store: Arc<dyn TransactionStore> = match &config.remote {
        Some(remote) => {
            tracing::info!(url = %remote.url, "Using remote store");
            Arc::new(RemoteStore::new(remote))
        }
        None => {
            tracing::info!(path = %config.database_path.display(), "Using local store");
            local.clone()
        }
    };
    let local = config.remote.is_some().then_some(local);

    let state = AppState {
        store,
        config: Arc::new(config),
        local,
        clock: Clock::System,
    };

    let app = router(state.clone());
    Ok((state, app))
}

/// The full router with static files and the middleware stack.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::routes())
        .fallback(fallback_handler)
        .nest_service("/static", ServeDir::new(&state.config.static_path))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error_page_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<std::io::Result<()>>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move { axum::serve(listener, app).await });

    Ok((actual_port, handle))
}
