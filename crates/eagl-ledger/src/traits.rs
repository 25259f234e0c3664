use eagl_types::{Block, Chain};

use crate::error::LedgerResult;

/// Write boundary for ledger append operations.
pub trait LedgerWriter: Send + Sync {
    /// Append a block carrying `payload` and return it once it is durable.
    fn append(&self, payload: &str) -> LedgerResult<Block>;
}

/// Tip of the chain together with the chain length, read atomically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Head {
    pub length: usize,
    pub block: Block,
}

/// Read boundary for ledger queries.
pub trait LedgerReader: Send + Sync {
    /// The tip of the chain.
    fn latest(&self) -> LedgerResult<Block>;

    /// The tip and the chain length from a single read.
    fn head(&self) -> LedgerResult<Head>;

    /// Block at `index`, or `Ok(None)` when out of range.
    fn get_by_index(&self, index: u64) -> LedgerResult<Option<Block>>;

    /// Number of blocks, genesis included.
    fn len(&self) -> LedgerResult<usize>;

    /// Verify the current chain end to end and return how many blocks were
    /// checked.
    fn verify_chain(&self) -> LedgerResult<usize>;

    /// A consistent copy of the whole chain.
    fn snapshot(&self) -> LedgerResult<Chain>;
}
