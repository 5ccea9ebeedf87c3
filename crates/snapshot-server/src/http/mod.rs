//! HTTP façade: routes, handlers and CORS.
//!
//! | Route | Resolver call |
//! |---|---|
//! | `GET /keys` | `list_namespaces` |
//! | `GET /files/{protocol}/{network}` | `list_snapshot_files` |
//! | `GET /files/{protocol}/{network}/latest` | `get_latest_snapshot` |
//! | `GET /files/{protocol}/{network}/info` | `get_snapshot_info` |

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use snapshot_core::SnapshotResolver;
use tokio::net::TcpListener;

mod cors;
mod handlers;
mod types;

pub use cors::CorsPolicy;

#[derive(Clone)]
pub struct ServerState {
    pub(crate) resolver: Arc<SnapshotResolver>,
}

pub fn router(resolver: Arc<SnapshotResolver>, cors_policy: CorsPolicy) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/keys", get(handlers::list_keys))
        .route("/files/{protocol}/{network}", get(handlers::list_files))
        .route(
            "/files/{protocol}/{network}/latest",
            get(handlers::latest_snapshot),
        )
        .route(
            "/files/{protocol}/{network}/info",
            get(handlers::snapshot_info),
        )
        .fallback(handlers::not_found)
        .with_state(ServerState { resolver })
        .layer(middleware::from_fn_with_state(
            Arc::new(cors_policy),
            cors::cors,
        ))
}

/// Serve until the future `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "snapshot server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
