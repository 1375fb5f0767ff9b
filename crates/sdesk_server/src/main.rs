use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

use sdesk_core::store::SqliteStore;

mod auth;
mod config;
mod error;
mod handlers;

use config::ServerConfig;
use handlers::AppState;

async fn request_span_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request.uri().path().to_string();
    let span = tracing::info_span!("http.request", method = %method, route = %route);
    next.run(request).instrument(span).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    let policy = Arc::new(config.load_policy()?);
    tracing::info!(
        db_path = %config.db_path.display(),
        warning_pct = policy.warning_pct(),
        "starting sdesk server"
    );

    let store = SqliteStore::open(&config.db_path)?;
    let state = AppState {
        store: Arc::new(store),
        policy,
    };

    let app = handlers::router(state).layer(middleware::from_fn(request_span_middleware));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
