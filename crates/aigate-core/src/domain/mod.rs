//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! transport or provider concerns.
//!
//! # Structure
//!
//! - `function` - Function registry and prompt building
//! - `task` - Async task record and status lifecycle
//! - `stream` - Provider and client-facing stream events

pub mod function;
pub mod stream;
pub mod task;

pub use function::{
    Function, FunctionError, FunctionRegistry, FunctionSpec, SUMMARIZE, TRANSLATE_EN_TO_ZH,
    TRANSLATE_ZH_TO_EN,
};
pub use stream::{DONE_SENTINEL, ProviderEvent, StreamEvent, TokenUsage};
pub use task::{Task, TaskId, TaskStatus};
