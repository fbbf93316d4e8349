//! Axum HTTP adapter for the aigate LLM gateway.
//!
//! Routes, handlers, the `{code, message, data}` envelope, SSE encoding of
//! stream relays and the composition root ([`bootstrap`]).
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/health` | plain `OK` |
//! | GET | `/api/v1/functions` | list functions |
//! | POST | `/api/v1/ai/call` | synchronous call |
//! | POST | `/api/v1/ai/task` | submit async task |
//! | GET | `/api/v1/ai/task/{taskId}` | poll task |
//! | POST | `/api/v1/ai/stream` | SSE stream |

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings; these are used by tests/
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tokio_test as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod sse;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;
