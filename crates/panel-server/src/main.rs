use anyhow::Result;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod extractors;
mod middleware;
mod request_context;
mod state;


use config::{Config, RunMode};
use error::ApiError;
use state::AppState;

const USAGE: &str = "\
panel-server: card dashboard API for a home server

USAGE:
    panel-server [--help]

ENVIRONMENT:
    RUN_MODE             development | production | testing (default: development)
    BIND_ADDRESS         listen address (default: 127.0.0.1:5000)
    ADMIN_PASSWORD       admin password (default: admin123)
    DATA_PATH            card document path, or :memory: (default: ./data/cards.json)
    MAX_LOGIN_ATTEMPTS   failed logins before lockout (5 / 3 / 999 by mode)
    LOCKOUT_DURATION     lockout window in seconds (60 / 600 / 1 by mode)
    SESSION_TTL_SECONDS  admin session lifetime (default: 86400)
    CORS_ENABLED         add permissive CORS headers (default: false)
    TRUSTED_PROXIES      comma-separated proxy IPs allowed to set X-Forwarded-For
    RUST_LOG             log filter (default: panel_server=debug,tower_http=debug)
";

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().skip(1).any(|arg| arg == "--help" || arg == "-h") {
        print!("{}", USAGE);
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panel_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    check_config(&config)?;

    let bind_address = config.bind_address;
    tracing::info!(
        mode = config.run_mode.as_str(),
        "Starting panel server on {}",
        bind_address
    );
    tracing::debug!(?config, "Loaded configuration");

    let state = Arc::new(AppState::new(config)?);
    let sweeper = spawn_sweeper(state.clone());

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on {}", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sweeper.abort();
    Ok(())
}

/// Report configuration problems; they only stop startup in production
fn check_config(config: &Config) -> Result<()> {
    let problems = config.validate();

    if config.run_mode == RunMode::Production && !problems.is_empty() {
        anyhow::bail!("Invalid production configuration: {}", problems.join("; "));
    }
    for problem in &problems {
        tracing::warn!("Configuration: {}", problem);
    }

    if config.uses_default_password() {
        tracing::warn!("ADMIN_PASSWORD is the built-in default, set a real password");
    }
    tracing::warn!(
        "The admin password is configured in plaintext; keep the environment file private"
    );

    Ok(())
}

fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        // Authentication
        .route("/auth", post(api::auth::login))
        .route("/logout", post(api::auth::logout))
        .route("/auth/status", get(api::auth::status))
        .route("/auth/security", get(api::auth::security))

        // Cards
        .route(
            "/cards",
            get(api::cards::list_cards).post(api::cards::create_card),
        )
        .route("/cards/reorder", post(api::cards::reorder_cards))
        .route(
            "/cards/:card_id",
            get(api::cards::get_card)
                .put(api::cards::update_card)
                .delete(api::cards::delete_card),
        )

        // Utilities
        .route("/icons", get(api::icons::list_icons))
        .route("/validate-name", post(api::utils::validate_name))
        .route("/stats", get(api::utils::stats))
        .route("/docs", get(api::docs::api_docs))
        .route("/health", get(api::health::health_check));

    let mut router = Router::new()
        .route("/", get(api::docs::index))
        .nest("/api", api)
        .fallback(not_found)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_id_middleware,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()));

    if state.config.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}

/// Periodically drop stale lockout records and expired sessions
fn spawn_sweeper(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_secs(state.config.lockout.window_seconds.max(1));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick fires immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            let (records, sessions) = state
                .auth_service
                .sweep(api::helpers::current_timestamp());
            if records > 0 || sessions > 0 {
                tracing::debug!(records, sessions, "Swept stale auth state");
            }
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Graceful shutdown initiated");
}
