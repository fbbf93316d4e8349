//! Command handlers.
//!
//! Handlers are thin: parse CLI input, call the core services, format
//! output for the terminal.

pub mod call;
pub mod functions;
pub mod serve;
