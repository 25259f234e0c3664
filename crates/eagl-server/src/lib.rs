//! HTTP node for the EAGL ledger.
//!
//! Serves a single append-only chain as JSON: health and status, block
//! lookup, append, and on-demand verification.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod shutdown;

pub use config::{NodeConfig, DEFAULT_NODE_NAME, DEFAULT_PORT};
pub use error::{ServerError, ServerResult};
pub use handler::{AppState, StatusResponse};
pub use router::build_router;
pub use server::EaglServer;
pub use shutdown::wait_for_shutdown_signal;
