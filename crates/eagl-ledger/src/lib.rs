//! Ledger service for the EAGL node.
//!
//! This crate is the boundary the transport layer talks to. It provides:
//! - [`Ledger`], the single owner of the in-memory chain and its durable mirror
//! - `LedgerReader` / `LedgerWriter` trait boundaries
//! - [`LedgerConfig`] for where and how the chain is stored
//!
//! Appends are fully serialized and persisted before they become visible;
//! reads never observe a partially appended chain.

pub mod config;
pub mod error;
pub mod ledger;
pub mod traits;

pub use config::LedgerConfig;
pub use error::{LedgerError, LedgerResult};
pub use ledger::Ledger;
pub use traits::{Head, LedgerReader, LedgerWriter};
