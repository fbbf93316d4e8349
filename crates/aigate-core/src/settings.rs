//! Gateway runtime settings and validation.
//!
//! These are pure domain types with no infrastructure dependencies. The
//! binary fills them from flags and environment; tests build them directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

/// Longest accepted retention or sweep window.
pub const MAX_WINDOW: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Default time a task record is kept after creation.
pub const DEFAULT_TASK_RETENTION: Duration = Duration::from_secs(10 * 60);

/// Default interval between eviction sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Default number of tasks that may call the provider at once.
pub const DEFAULT_MAX_CONCURRENT_TASKS: usize = 16;

/// Default number of stream relays that may be open at once.
pub const DEFAULT_MAX_CONCURRENT_STREAMS: usize = 64;

/// Default capacity of the per-stream event channel.
pub const DEFAULT_STREAM_BUFFER: usize = 64;

/// Runtime limits for the task executor and stream relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// How long a task record lives after creation.
    pub task_retention: Duration,
    /// How often the eviction sweep runs.
    pub sweep_interval: Duration,
    /// Bound on concurrent task executions.
    pub max_concurrent_tasks: usize,
    /// Bound on concurrent stream relays.
    pub max_concurrent_streams: usize,
    /// Capacity of the relay's outbound event channel.
    pub stream_buffer: usize,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl GatewaySettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            task_retention: DEFAULT_TASK_RETENTION,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            max_concurrent_tasks: DEFAULT_MAX_CONCURRENT_TASKS,
            max_concurrent_streams: DEFAULT_MAX_CONCURRENT_STREAMS,
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }

    #[must_use]
    pub const fn with_task_retention(mut self, retention: Duration) -> Self {
        self.task_retention = retention;
        self
    }

    #[must_use]
    pub const fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    #[must_use]
    pub const fn with_max_concurrent_tasks(mut self, limit: usize) -> Self {
        self.max_concurrent_tasks = limit;
        self
    }

    #[must_use]
    pub const fn with_max_concurrent_streams(mut self, limit: usize) -> Self {
        self.max_concurrent_streams = limit;
        self
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Task retention must be at least one second")]
    RetentionTooShort,

    #[error("Sweep interval must be at least one second")]
    SweepIntervalTooShort,

    #[error("Task retention must not exceed {} seconds", MAX_WINDOW.as_secs())]
    RetentionTooLong,

    #[error("Sweep interval must not exceed {} seconds", MAX_WINDOW.as_secs())]
    SweepIntervalTooLong,

    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("{field} must not exceed {max}")]
    LimitTooLarge { field: &'static str, max: usize },
}

fn check_limit(field: &'static str, value: usize) -> Result<(), SettingsError> {
    if value == 0 {
        return Err(SettingsError::ZeroLimit { field });
    }
    if value > Semaphore::MAX_PERMITS {
        return Err(SettingsError::LimitTooLarge {
            field,
            max: Semaphore::MAX_PERMITS,
        });
    }
    Ok(())
}

/// Validate gateway settings.
pub fn validate_settings(settings: &GatewaySettings) -> Result<(), SettingsError> {
    if settings.task_retention < Duration::from_secs(1) {
        return Err(SettingsError::RetentionTooShort);
    }
    if settings.task_retention > MAX_WINDOW {
        return Err(SettingsError::RetentionTooLong);
    }
    if settings.sweep_interval < Duration::from_secs(1) {
        return Err(SettingsError::SweepIntervalTooShort);
    }
    if settings.sweep_interval > MAX_WINDOW {
        return Err(SettingsError::SweepIntervalTooLong);
    }
    check_limit("max_concurrent_tasks", settings.max_concurrent_tasks)?;
    check_limit("max_concurrent_streams", settings.max_concurrent_streams)?;
    // tokio::sync::mpsc::channel panics above the same bound.
    check_limit("stream_buffer", settings.stream_buffer)
}
