//! Block store for the EAGL node.
//!
//! Owns everything between an in-memory [`Chain`] and its durable form:
//! building genesis and successor blocks, the JSON chain codec, and the
//! storage backends the chain is mirrored to.
//!
//! # Storage Backends
//!
//! All backends implement the [`ChainStore`] trait:
//!
//! - [`FileChainStore`] -- single JSON file, replaced atomically on every write
//! - [`InMemoryChainStore`] -- process-local store for tests and embedding
//!
//! # Design Rules
//!
//! 1. A chain is only ever written whole; readers see the old file or the new
//!    one, never a mix.
//! 2. Loaded data is untrusted until verified.
//! 3. Malformed or corrupt storage is reported, never silently replaced.
//! 4. All I/O errors are propagated, never silently ignored.
//!
//! [`Chain`]: eagl_types::Chain

pub mod builder;
pub mod codec;
pub mod error;
pub mod file;
pub mod load;
pub mod memory;
pub mod traits;

pub use builder::{create_genesis, create_next, DEFAULT_GENESIS_PAYLOAD};
pub use codec::{deserialize, serialize};
pub use error::{StoreError, StoreResult};
pub use file::{persist, FileChainStore};
pub use load::{load_or_init, LoadOptions};
pub use memory::InMemoryChainStore;
pub use traits::ChainStore;
