//! Core domain, ports and services for the aigate LLM gateway.
//!
//! This crate holds everything that does not depend on a transport or a
//! concrete provider:
//!
//! - [`domain`]: functions, tasks and stream events
//! - [`ports`]: the [`ChatCompletionPort`] trait and core errors
//! - [`services`]: [`ProviderClient`], [`TaskService`] and [`StreamRelay`]
//! - [`settings`]: runtime limits and their validation
//!
//! Adapters (`aigate-ark`, `aigate-axum`) depend on this crate, never the
//! other way round.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    DONE_SENTINEL, Function, FunctionError, FunctionRegistry, FunctionSpec, ProviderEvent,
    SUMMARIZE, StreamEvent, TRANSLATE_EN_TO_ZH, TRANSLATE_ZH_TO_EN, Task, TaskId, TaskStatus,
    TokenUsage,
};
pub use ports::{ChatCompletionPort, CoreError, ProviderError, ProviderResult};
pub use services::{
    ProviderClient, SHUTDOWN_MESSAGE, StreamRelay, TaskService, TaskStore, TaskStoreError,
};
pub use settings::{GatewaySettings, SettingsError, validate_settings};
