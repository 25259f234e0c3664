//! Construction of new blocks.

use eagl_crypto::compute_hash;
use eagl_types::{timestamp, Block, BlockHash, Chain};

use crate::error::{StoreError, StoreResult};

/// Payload recorded in the genesis block unless configured otherwise.
pub const DEFAULT_GENESIS_PAYLOAD: &str = "Genesis Block";

/// Build a genesis block stamped with the current time.
pub fn create_genesis(payload: &str) -> Block {
    let ts = timestamp::now();
    let prev_hash = BlockHash::sentinel();
    let hash = compute_hash(0, &ts, payload, &prev_hash);
    Block::from_parts(0, ts, payload, prev_hash, hash)
}

/// Build the successor of the chain's last block.
///
/// The chain itself is left untouched; the caller decides whether to append
/// the returned block.
pub fn create_next(chain: &Chain, payload: &str) -> StoreResult<Block> {
    let last = chain.last().ok_or(StoreError::EmptyChain)?;
    let index = last
        .index()
        .checked_add(1)
        .ok_or(StoreError::IndexOverflow { tip: last.index() })?;
    let ts = timestamp::now();
    let prev_hash = *last.hash();
    let hash = compute_hash(index, &ts, payload, &prev_hash);
    Ok(Block::from_parts(index, ts, payload, prev_hash, hash))
}
