use super::cookie::CookieSigner;
use super::handlers::{
    handle_aggregates, handle_generate, handle_health, handle_index, handle_rate,
};
use super::session::SessionTable;
use super::views::Views;
use super::{AppState, MAX_BODY_SIZE};

use crate::config::Config;
use crate::feedback::RatingFeedback;
use crate::media::{ArtifactStore, GENERATED_ROUTE, INSPIRATION_ROUTE};
use crate::store::create_store;
use crate::studio::Studio;
use anyhow::{Context, Result};
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;

/// Returns true when the bind address is not a loopback address.
fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Run the web front end on `host:port`.
pub async fn run_gateway(host: &str, port: u16, config: Arc<Config>) -> Result<()> {
    if is_public_bind(host) && !config.server.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the generator would be reachable from the network.\n\
             Fix: use --host 127.0.0.1 (default) or set\n\
             [server] allow_public_bind = true in config.toml."
        );
    }

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("parse server bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind server socket")?;

    run_gateway_with_listener(host, listener, config).await
}

/// Open the store, seed it with the catalog and wire up every handler
/// dependency.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let catalog = Arc::new(config.validate()?);
    let store = create_store(config).await?;
    store
        .seed(&catalog)
        .await
        .context("seed aggregate store with the catalog")?;

    let artifacts = Arc::new(ArtifactStore::new(
        config.generated_dir(),
        config.inspiration_dir(),
    )?);
    let studio = Studio::from_config(config, catalog, store.clone(), artifacts.clone())?;

    if config.server.uses_default_secret() {
        tracing::warn!("session cookies are signed with the built-in secret; set SMILE_SECRET");
    }
    let cookies = CookieSigner::new(&config.server.secret_key, config.server.session_ttl_secs)?;

    Ok(AppState {
        studio: Arc::new(studio),
        feedback: RatingFeedback::new(store, artifacts.clone()),
        artifacts,
        sessions: Arc::new(SessionTable::new(Duration::from_secs(
            config.server.session_ttl_secs,
        ))),
        cookies: Arc::new(cookies),
        views: Arc::new(Views::new()?),
    })
}

/// Run the web front end from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
) -> Result<()> {
    let actual_port = listener
        .local_addr()
        .context("get server listener local address")?
        .port();
    let display_addr = format!("{host}:{actual_port}");

    let state = build_state(&config).await?;
    print_gateway_banner(&display_addr, &config, state.studio.producer_name());

    let app = build_app(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP front end")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

fn print_gateway_banner(display_addr: &str, config: &Config, backend: &str) {
    println!("Smile Generator listening on http://{display_addr}");
    println!("  GET  /");
    println!("  POST /generate");
    println!("  POST /rate");
    println!("  GET  {GENERATED_ROUTE}/<file>");
    println!("  GET  {INSPIRATION_ROUTE}/<file>");
    println!("  GET  /api/aggregates");
    println!("  GET  /health");
    println!("  Image backend: {backend}");
    println!("  Aggregate store: {}", config.store.backend);
    if config.selection.gating.is_some() {
        println!("  History gating enabled");
    }
}

pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let generated = ServeDir::new(state.artifacts.generated_dir());
    let inspiration = ServeDir::new(state.artifacts.inspiration_dir());

    Router::new()
        .route("/", get(handle_index))
        .route("/generate", post(handle_generate))
        .route("/rate", post(handle_rate))
        .route("/api/aggregates", get(handle_aggregates))
        .route("/health", get(handle_health))
        .nest_service(GENERATED_ROUTE, generated)
        .nest_service(INSPIRATION_ROUTE, inspiration)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}
