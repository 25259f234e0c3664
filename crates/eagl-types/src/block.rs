use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hash::BlockHash;

/// One immutable ledger record.
///
/// Fields are private: once a block exists its content can only be read.
/// The stored `hash` is whatever the block was created (or loaded) with; it
/// is not recomputed here, so a block read from storage may carry a hash that
/// does not match its fields until the chain is verified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    #[serde(with = "crate::timestamp")]
    timestamp: DateTime<Utc>,
    #[serde(rename = "data", alias = "payload")]
    payload: String,
    prev_hash: BlockHash,
    hash: BlockHash,
}

impl Block {
    /// Assemble a block from already-computed parts.
    ///
    /// No hashing or link checking happens here; use the block builders in
    /// `eagl-store` to create new blocks.
    pub fn from_parts(
        index: u64,
        timestamp: DateTime<Utc>,
        payload: impl Into<String>,
        prev_hash: BlockHash,
        hash: BlockHash,
    ) -> Self {
        Self {
            index,
            timestamp,
            payload: payload.into(),
            prev_hash,
            hash,
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn prev_hash(&self) -> &BlockHash {
        &self.prev_hash
    }

    pub fn hash(&self) -> &BlockHash {
        &self.hash
    }

    /// Returns `true` if this block sits at the genesis position.
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}
