//! Application Startup
//!
//! Application building and server initialization.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::application::services::{ChatService, MessageServiceImpl, RoomServiceImpl};
use crate::config::{Settings, StorageDriver};
use crate::infrastructure::database;
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::repositories::{
    PgMessageRepository, PgRoomRepository, PgUserDirectory,
};
use crate::presentation::http::{handlers::health, routes};
use crate::presentation::middleware::{cors, logging, timeout};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    /// Present only with the Postgres driver; used by the readiness probe.
    pub db: Option<PgPool>,
    pub settings: Arc<Settings>,
}

/// Wire the storage backend selected by `database.driver` into the chat façade.
pub async fn build_state(settings: &Settings) -> Result<AppState> {
    let (chat, db) = match settings.database.driver {
        StorageDriver::Postgres => {
            let pool = database::create_pool(&settings.database).await?;
            tracing::info!("Database connection pool created");

            if settings.database.run_migrations {
                database::run_migrations(&pool).await?;
                tracing::info!("Database migrations applied");
            }

            let rooms = Arc::new(PgRoomRepository::new(pool.clone()));
            let messages = Arc::new(PgMessageRepository::new(pool.clone()));
            let users = Arc::new(PgUserDirectory::new(pool.clone()));

            let chat = ChatService::new(
                Arc::new(RoomServiceImpl::new(rooms.clone(), users)),
                Arc::new(MessageServiceImpl::new(
                    messages,
                    rooms,
                    settings.pagination.clone(),
                )),
            );
            (chat, Some(pool))
        }
        StorageDriver::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(MemoryStore::new());

            let chat = ChatService::new(
                Arc::new(RoomServiceImpl::new(store.clone(), store.clone())),
                Arc::new(MessageServiceImpl::new(
                    store.clone(),
                    store,
                    settings.pagination.clone(),
                )),
            );
            (chat, None)
        }
    };

    Ok(AppState {
        chat: Arc::new(chat),
        db,
        settings: Arc::new(settings.clone()),
    })
}

/// Router with the full middleware stack.
pub fn build_router(state: AppState) -> Router {
    let settings = state.settings.clone();

    routes::create_router(state)
        .layer(timeout::create_timeout_layer(&settings.server))
        .layer(logging::create_trace_layer())
        .layer(cors::create_cors_layer(&settings.cors))
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
    shutdown_timeout: Duration,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        settings.validate()?;
        health::init_server_start();

        let state = build_state(&settings).await?;
        let router = build_router(state);

        let listener = TcpListener::bind(settings.server_addr()).await?;
        tracing::info!(
            addr = %listener.local_addr()?,
            driver = %settings.database.driver,
            "Listening"
        );

        Ok(Self {
            listener,
            router,
            shutdown_timeout: Duration::from_secs(settings.server.shutdown_timeout_secs),
        })
    }

    /// Run the server until Ctrl+C / SIGTERM. In-flight requests get
    /// `shutdown_timeout` to finish.
    pub async fn run_until_stopped(self) -> Result<()> {
        let stopping = Arc::new(Notify::new());
        let signal = stopping.clone();

        let server = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                signal.notify_one();
            })
            .into_future();
        tokio::pin!(server);

        tokio::select! {
            result = &mut server => result?,
            _ = stopping.notified() => {
                match tokio::time::timeout(self.shutdown_timeout, &mut server).await {
                    Ok(result) => result?,
                    Err(_) => tracing::warn!(
                        timeout_secs = self.shutdown_timeout.as_secs(),
                        "Graceful shutdown timed out; dropping open connections"
                    ),
                }
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => tracing::info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                ctrl_c.await.ok();
                tracing::info!("Received Ctrl+C, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        tracing::info!("Received Ctrl+C, shutting down...");
    }
}
