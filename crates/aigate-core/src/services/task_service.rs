//! Async task store and executor.
//!
//! `TaskStore` owns the task map. `TaskService` accepts submissions, spawns
//! one executor per task and runs the periodic eviction sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{RwLock, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::domain::{Task, TaskId, TaskStatus};
use crate::ports::CoreError;
use crate::settings::GatewaySettings;

use super::ProviderClient;

/// Result text recorded for tasks interrupted by process shutdown.
pub const SHUTDOWN_MESSAGE: &str = "Task aborted: server is shutting down";

/// Errors from task store mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskStoreError {
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("Illegal task transition {from} -> {to}")]
    IllegalTransition { from: TaskStatus, to: TaskStatus },
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// Concurrent map from task ID to task record.
///
/// Readers get cloned snapshots; every mutation happens under the write lock.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl TaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task record, replacing nothing.
    pub async fn insert(&self, task: Task) {
        self.tasks
            .write()
            .await
            .entry(task.task_id.clone())
            .or_insert(task);
    }

    /// Snapshot of a task, or `None` if unknown.
    pub async fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.read().await.get(id).cloned()
    }

    /// Move a task to `next`, optionally recording a result.
    ///
    /// Refuses anything but the legal successor of the current status.
    pub async fn transition(
        &self,
        id: &TaskId,
        next: TaskStatus,
        result: Option<String>,
    ) -> Result<Task, TaskStoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| TaskStoreError::NotFound(id.clone()))?;

        if !task.status.can_transition_to(next) {
            return Err(TaskStoreError::IllegalTransition {
                from: task.status,
                to: next,
            });
        }

        task.status = next;
        if let Some(result) = result {
            task.result = result;
        }
        task.updated_at = Some(Utc::now());
        Ok(task.clone())
    }

    /// Remove terminal tasks created before `now - retention`.
    ///
    /// Pending and processing tasks are kept until they finish. Returns the
    /// number of records removed.
    pub async fn evict_expired(&self, now: DateTime<Utc>, retention: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(retention)
            .ok()
            .and_then(|window| now.checked_sub_signed(window))
        else {
            return 0;
        };

        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|_, task| !(task.status.is_terminal() && task.created_at < cutoff));
        before - tasks.len()
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Service
// ─────────────────────────────────────────────────────────────────────────────

/// Submits tasks and drives them through their lifecycle.
#[derive(Debug, Clone)]
pub struct TaskService {
    store: Arc<TaskStore>,
    client: ProviderClient,
    permits: Arc<Semaphore>,
    shutdown: CancellationToken,
    retention: Duration,
    sweep_interval: Duration,
}

impl TaskService {
    /// Create a task service.
    ///
    /// `shutdown` is observed by every executor and by the sweeper.
    pub fn new(
        client: ProviderClient,
        settings: &GatewaySettings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store: Arc::new(TaskStore::new()),
            client,
            permits: Arc::new(Semaphore::new(settings.max_concurrent_tasks)),
            shutdown,
            retention: settings.task_retention,
            sweep_interval: settings.sweep_interval,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    /// Validate and enqueue a task. Returns as soon as the record exists.
    pub async fn submit(&self, function: &str, content: &str) -> Result<TaskId, CoreError> {
        self.client.validate(function, content)?;

        let task = Task::new(function, content);
        let task_id = task.task_id.clone();
        self.store.insert(task).await;

        tracing::info!(task_id = %task_id, function = %function, "Task submitted");

        tokio::spawn(execute(
            Arc::clone(&self.store),
            self.client.clone(),
            Arc::clone(&self.permits),
            self.shutdown.clone(),
            task_id.clone(),
            function.to_string(),
            content.to_string(),
        ));

        Ok(task_id)
    }

    /// Snapshot of a task, or `None` if it never existed or was evicted.
    pub async fn get(&self, task_id: &TaskId) -> Option<Task> {
        self.store.get(task_id).await
    }

    /// Start the periodic eviction sweep. Stops when the shutdown token fires.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let shutdown = self.shutdown.clone();
        let retention = self.retention;
        let period = self.sweep_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    () = shutdown.cancelled() => {
                        tracing::debug!("Task sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let removed = store.evict_expired(Utc::now(), retention).await;
                        if removed > 0 {
                            tracing::info!(removed, "Evicted expired tasks");
                        }
                    }
                }
            }
        })
    }
}

/// One executor run: wait for a slot, call the provider, record the outcome.
async fn execute(
    store: Arc<TaskStore>,
    client: ProviderClient,
    permits: Arc<Semaphore>,
    shutdown: CancellationToken,
    task_id: TaskId,
    function: String,
    content: String,
) {
    let permit = tokio::select! {
        () = shutdown.cancelled() => None,
        permit = permits.acquire_owned() => permit.ok(),
    };
    let Some(_permit) = permit else {
        fail(&store, &task_id, SHUTDOWN_MESSAGE.to_string()).await;
        return;
    };

    if let Err(e) = store
        .transition(&task_id, TaskStatus::Processing, None)
        .await
    {
        tracing::warn!(task_id = %task_id, error = %e, "Task vanished before processing");
        return;
    }
    tracing::debug!(task_id = %task_id, "Task processing");

    let outcome = tokio::select! {
        () = shutdown.cancelled() => Err(SHUTDOWN_MESSAGE.to_string()),
        result = client.call(&function, &content) => result.map_err(|e| e.to_string()),
    };

    match outcome {
        Ok(text) => {
            match store
                .transition(&task_id, TaskStatus::Completed, Some(text))
                .await
            {
                Ok(_) => tracing::info!(task_id = %task_id, "Task completed"),
                Err(e) => tracing::warn!(task_id = %task_id, error = %e, "Could not record result"),
            }
        }
        Err(message) => fail(&store, &task_id, message).await,
    }
}

/// Mark a task failed, walking through `processing` if it never started.
async fn fail(store: &TaskStore, task_id: &TaskId, message: String) {
    if store.get(task_id).await.map(|t| t.status) == Some(TaskStatus::Pending) {
        if let Err(e) = store
            .transition(task_id, TaskStatus::Processing, None)
            .await
        {
            tracing::warn!(task_id = %task_id, error = %e, "Could not start task before failing it");
        }
    }
    match store
        .transition(task_id, TaskStatus::Failed, Some(message.clone()))
        .await
    {
        Ok(_) => tracing::warn!(task_id = %task_id, error = %message, "Task failed"),
        Err(e) => tracing::warn!(task_id = %task_id, error = %e, "Could not record failure"),
    }
}
