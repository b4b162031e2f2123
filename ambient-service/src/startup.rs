use crate::config::AmbientConfig;
use crate::handlers;
use crate::services::{Database, FcmProvider, MockPushProvider, PushProvider};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AmbientConfig,
    pub db: Database,
    pub push_provider: Arc<dyn PushProvider>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: AmbientConfig) -> Result<Self, AppError> {
        // The push client is built once here and injected into the handlers.
        // An enabled but misconfigured provider is a startup failure, not
        // something to paper over with the mock.
        let push_provider: Arc<dyn PushProvider> = if config.fcm.enabled {
            let provider = FcmProvider::new(config.fcm.clone()).map_err(|e| {
                tracing::error!("Failed to initialize FCM provider: {}", e);
                AppError::ConfigError(anyhow::anyhow!(
                    "FCM provider initialization failed: {}",
                    e
                ))
            })?;
            tracing::info!("FCM push provider initialized");
            Arc::new(provider)
        } else {
            tracing::info!("FCM provider disabled, using mock push provider");
            Arc::new(MockPushProvider::new(true))
        };

        Self::build_with_provider(config, push_provider).await
    }

    /// Build with an explicit push provider. Used by tests to substitute a
    /// provider they keep a handle on.
    pub async fn build_with_provider(
        config: AmbientConfig,
        push_provider: Arc<dyn PushProvider>,
    ) -> Result<Self, AppError> {
        let db = Database::connect(&config.database.url).await.map_err(|e| {
            tracing::error!("Failed to connect to SQLite: {}", e);
            e
        })?;
        db.run_migrations().await.map_err(|e| {
            tracing::error!("Failed to run database migrations: {}", e);
            e
        })?;

        let state = AppState {
            config: config.clone(),
            db: db.clone(),
            push_provider,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route(
                "/registerToken",
                post(handlers::register_token).fallback(handlers::invalid_method),
            )
            .route(
                "/sendAll",
                post(handlers::send_all).fallback(handlers::invalid_method),
            )
            .route(
                "/writeTemp",
                post(handlers::write_temp).fallback(handlers::invalid_method),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
