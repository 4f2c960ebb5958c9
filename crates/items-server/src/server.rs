use std::sync::Arc;

use tokio::net::TcpListener;

use items_store::{InMemoryItemStore, ItemStore};

use crate::action_log::{ActionLog, TracingActionLog};
use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::build_router;
use crate::state::AppState;
use crate::tasks::TaskQueue;

/// Items API server.
pub struct ItemsServer {
    config: ServerConfig,
    store: Arc<dyn ItemStore>,
    action_log: Arc<dyn ActionLog>,
}

impl ItemsServer {
    /// Server with a fresh in-memory store, seeded if the config asks for it.
    pub fn new(config: ServerConfig) -> Self {
        let store: Arc<dyn ItemStore> = if config.seed {
            Arc::new(InMemoryItemStore::seeded())
        } else {
            Arc::new(InMemoryItemStore::new())
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: ServerConfig, store: Arc<dyn ItemStore>) -> Self {
        Self {
            config,
            store,
            action_log: Arc::new(TracingActionLog),
        }
    }

    /// Replace where background log actions are recorded.
    pub fn with_action_log(mut self, log: Arc<dyn ActionLog>) -> Self {
        self.action_log = log;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    /// Build the router and start its background worker. Must be called
    /// from within a tokio runtime.
    pub fn router(&self) -> axum::Router {
        let tasks = TaskQueue::spawn(Arc::clone(&self.action_log));
        let state = AppState::new(
            Arc::clone(&self.store),
            tasks,
            self.config.welcome_message.as_str(),
        );
        build_router(state)
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("items server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("items server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
