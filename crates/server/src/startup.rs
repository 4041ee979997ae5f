use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::runtime;

use crate::context::{ServiceKind, ServiceState};
use crate::errors::StartupError;
use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the service's collections and build its router.
pub async fn build_app(kind: ServiceKind, cfg: &AppConfig) -> Result<Router, StartupError> {
    runtime::ensure_env(&cfg.storage.data_dir)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    let state = ServiceState::open(kind, &cfg.storage)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: build the app of `kind` and serve it until the listener fails
pub async fn run(kind: ServiceKind, cfg: AppConfig) -> Result<(), StartupError> {
    let app = build_app(kind, &cfg).await?;

    let port = kind.port(&cfg.services);
    let listener = TcpListener::bind((cfg.server.host.as_str(), port))
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("cannot bind {}:{port}: {e}", cfg.server.host)))?;
    let addr = listener.local_addr().map_err(|e| StartupError::Runtime(e.to_string()))?;
    info!(
        service = kind.name(),
        %addr,
        data_dir = %cfg.storage.data_dir.display(),
        optimistic = cfg.storage.optimistic_concurrency,
        "listening"
    );
    axum::serve(listener, app)
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    Ok(())
}
