//! Core services - the application's business logic layer.
//!
//! Services orchestrate between ports and domain logic. They never see a
//! concrete provider; adapters are injected as `Arc<dyn ChatCompletionPort>`.

mod provider_client;
mod stream_relay;
mod task_service;

pub use provider_client::ProviderClient;
pub use stream_relay::StreamRelay;
pub use task_service::{SHUTDOWN_MESSAGE, TaskService, TaskStore, TaskStoreError};
