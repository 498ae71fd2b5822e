//! Application startup and lifecycle management.

use crate::config::Settings;
use crate::handlers::{app, genres};
use crate::services::GenreRegistry;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    access_log::access_log_middleware,
    auth::{authentication_middleware, PassThrough, SharedAuthenticator},
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, request_logging_middleware, RequestId},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub registry: GenreRegistry,
    pub authenticator: SharedAuthenticator,
    pub static_dir: PathBuf,
    pub access_log: bool,
}

impl AppState {
    pub fn new(registry: GenreRegistry) -> Self {
        Self {
            registry,
            authenticator: Arc::new(PassThrough),
            static_dir: PathBuf::from("public"),
            access_log: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            registry: GenreRegistry::new(settings.registry.id_allocation),
            authenticator: Arc::new(PassThrough),
            static_dir: settings.static_dir.clone(),
            access_log: settings.access_log_enabled(),
        }
    }

    pub fn with_authenticator(mut self, authenticator: SharedAuthenticator) -> Self {
        self.authenticator = authenticator;
        self
    }

    pub fn with_static_dir(mut self, static_dir: impl Into<PathBuf>) -> Self {
        self.static_dir = static_dir.into();
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(app::index))
        .route("/health", get(app::health_check))
        .route(
            "/api/genres",
            get(genres::list_genres).post(genres::create_genre),
        )
        .route(
            "/api/genres/:id",
            get(genres::get_genre)
                .put(genres::update_genre)
                .delete(genres::delete_genre),
        )
        .fallback_service(ServeDir::new(&state.static_dir))
        .layer(from_fn_with_state(
            state.authenticator.clone(),
            authentication_middleware,
        ))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_logging_middleware));

    let router = if state.access_log {
        router.layer(from_fn(access_log_middleware))
    } else {
        router
    };

    router
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .map(|id| id.0.as_str())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Bind the listener (port 0 picks a free port) and assemble the router.
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let state = AppState::from_settings(&settings);
        tracing::debug!(
            target: "app::db",
            genres = state.registry.len().await,
            id_allocation = ?state.registry.id_allocation(),
            "Genre registry seeded"
        );

        if state.access_log {
            tracing::debug!(target: "app::startup", "Access logging enabled");
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        tracing::info!("Listening on {}", self.port);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
