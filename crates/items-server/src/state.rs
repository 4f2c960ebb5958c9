use std::sync::Arc;

use items_store::ItemStore;

use crate::tasks::TaskQueue;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub tasks: TaskQueue,
    pub welcome: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>, tasks: TaskQueue, welcome: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            tasks,
            welcome: welcome.into(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("welcome", &self.welcome)
            .finish_non_exhaustive()
    }
}
