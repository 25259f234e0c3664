//! Foundation types for the EAGL node.
//!
//! Every other EAGL crate depends on `eagl-types`.
//!
//! # Key Types
//!
//! - [`Block`]: one immutable ledger record, linked to its predecessor by hash
//! - [`BlockHash`]: 32-byte content digest with a stable hex text form
//! - [`Chain`]: the ordered sequence of blocks from genesis to the tip

pub mod block;
pub mod chain;
pub mod error;
pub mod hash;
pub mod timestamp;

pub use block::Block;
pub use chain::Chain;
pub use error::TypeError;
pub use hash::BlockHash;
