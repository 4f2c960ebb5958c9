//! Fire-and-forget background jobs.
//!
//! Handlers add jobs to the per-request [`BackgroundTasks`] collector.
//! [`run_background_tasks`] hands the collected jobs to the [`TaskQueue`]
//! only after the inner service has produced a successful response, and a
//! single worker runs them in submission order. Job outcomes are logged and
//! never reach the client.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::mpsc;

use crate::action_log::ActionLog;
use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackgroundJob {
    /// Record `action` on the configured [`ActionLog`].
    LogAction { action: String },
}

impl BackgroundJob {
    pub fn log_action(action: impl Into<String>) -> Self {
        Self::LogAction {
            action: action.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LogAction { .. } => "log_action",
        }
    }

    async fn run(self, log: &dyn ActionLog) -> ServerResult<()> {
        match self {
            Self::LogAction { action } => log.record(&action).await,
        }
    }
}

/// Jobs collected while a single request is being handled.
#[derive(Clone, Debug, Default)]
pub struct BackgroundTasks {
    jobs: Arc<Mutex<Vec<BackgroundJob>>>,
}

impl BackgroundTasks {
    pub fn add(&self, job: BackgroundJob) {
        match self.jobs.lock() {
            Ok(mut jobs) => jobs.push(job),
            Err(_) => tracing::warn!(job = job.name(), "task collector poisoned; dropping job"),
        }
    }

    fn take(&self) -> Vec<BackgroundJob> {
        self.jobs
            .lock()
            .map(|mut jobs| std::mem::take(&mut *jobs))
            .unwrap_or_default()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BackgroundTasks
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BackgroundTasks>()
            .cloned()
            .ok_or_else(|| ServerError::Internal("background task collector not installed".into()))
    }
}

/// Sending half of the background worker.
///
/// The worker stops once every clone of the queue has been dropped and the
/// remaining jobs have run.
#[derive(Clone, Debug)]
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<BackgroundJob>,
}

impl TaskQueue {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn(log: Arc<dyn ActionLog>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<BackgroundJob>();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let name = job.name();
                if let Err(e) = job.run(log.as_ref()).await {
                    tracing::warn!(job = name, error = %e, "background job failed");
                }
            }
            tracing::debug!("background worker stopped");
        });
        Self { tx }
    }

    pub fn submit(&self, job: BackgroundJob) {
        if let Err(mpsc::error::SendError(job)) = self.tx.send(job) {
            tracing::warn!(job = job.name(), "background worker gone; dropping job");
        }
    }
}

/// Middleware installing a [`BackgroundTasks`] collector on each request and
/// submitting its jobs once the response exists.
///
/// Jobs collected by a request that ends in an error response are dropped.
pub async fn run_background_tasks(
    State(queue): State<TaskQueue>,
    mut request: Request,
    next: Next,
) -> Response {
    let tasks = BackgroundTasks::default();
    request.extensions_mut().insert(tasks.clone());

    let response = next.run(request).await;

    let jobs = tasks.take();
    if !jobs.is_empty() {
        if response.status().is_success() {
            for job in jobs {
                queue.submit(job);
            }
        } else {
            tracing::debug!(
                count = jobs.len(),
                status = %response.status(),
                "discarding background jobs"
            );
        }
    }
    response
}
