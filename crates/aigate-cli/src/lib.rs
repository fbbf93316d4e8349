//! Command-line front end for the aigate gateway.
//!
//! The `aigate` binary runs the HTTP server (`serve`), lists the registered
//! functions (`functions`) and invokes a function once from the terminal
//! (`call`). Provider settings come from flags, environment variables or a
//! `.env` file.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tokio_test as _;

// Used by the binary only.
use dotenvy as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod parser;
pub mod presentation;

pub use bootstrap::{CliContext, bootstrap};
pub use commands::{ArkArgs, Commands, ServeArgs};
pub use error::CliError;
pub use parser::Cli;
