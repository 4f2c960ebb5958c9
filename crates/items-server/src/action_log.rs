use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{ServerError, ServerResult};

/// Destination for actions recorded by background jobs.
#[async_trait]
pub trait ActionLog: Send + Sync {
    async fn record(&self, action: &str) -> ServerResult<()>;
}

/// Writes each action as a `tracing` event.
pub struct TracingActionLog;

#[async_trait]
impl ActionLog for TracingActionLog {
    async fn record(&self, action: &str) -> ServerResult<()> {
        tracing::info!(target: "items::actions", action, "Action logged");
        Ok(())
    }
}

/// Keeps recorded actions in memory. Used by tests and embedders that want
/// to observe background work.
#[derive(Default)]
pub struct MemoryActionLog {
    entries: Mutex<Vec<String>>,
    recorded: Notify,
}

impl MemoryActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Wait until at least `count` actions have been recorded.
    pub async fn wait_for(&self, count: usize) -> Vec<String> {
        loop {
            let recorded = self.recorded.notified();
            let entries = self.entries();
            if entries.len() >= count {
                return entries;
            }
            recorded.await;
        }
    }
}

#[async_trait]
impl ActionLog for MemoryActionLog {
    async fn record(&self, action: &str) -> ServerResult<()> {
        self.entries
            .lock()
            .map_err(|_| ServerError::Internal("action log lock poisoned".into()))?
            .push(action.to_owned());
        self.recorded.notify_waiters();
        Ok(())
    }
}
