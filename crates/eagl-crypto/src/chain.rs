use std::fmt;

use eagl_types::{Block, BlockHash, Chain};
use serde::{Deserialize, Serialize};

use crate::hasher::BlockHasher;

/// Kind of integrity violation found while walking a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// `prev_hash` does not reference the predecessor (or the sentinel, for genesis).
    BadLink,
    /// Stored hash differs from the hash of the block's own fields.
    BadHash,
    /// Index is not the predecessor's index plus one (or not 0, for genesis).
    BadIndex,
    /// The chain has no blocks at all.
    Empty,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BadLink => "bad link",
            Self::BadHash => "bad hash",
            Self::BadIndex => "bad index",
            Self::Empty => "empty chain",
        };
        f.write_str(s)
    }
}

/// Integrity violation reported by [`ChainVerifier::verify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("chain verification failed at index {index}: {kind}")]
pub struct VerificationError {
    /// Position of the offending block (0 for an empty chain).
    pub index: u64,
    pub kind: ViolationKind,
}

impl VerificationError {
    pub fn new(index: u64, kind: ViolationKind) -> Self {
        Self { index, kind }
    }
}

/// Hash chain integrity verifier.
///
/// Walks the chain once and fails on the first violation. Per block the
/// checks run in a fixed order: index, link, then hash.
pub struct ChainVerifier;

impl ChainVerifier {
    /// Verify a chain under the current canonical encoding.
    pub fn verify(chain: &Chain) -> Result<(), VerificationError> {
        Self::verify_with(&BlockHasher::V1, chain)
    }

    /// Verify a chain with an explicit hasher.
    pub fn verify_with(hasher: &BlockHasher, chain: &Chain) -> Result<(), VerificationError> {
        let mut blocks = chain.iter().enumerate();

        let Some((_, genesis)) = blocks.next() else {
            return Err(VerificationError::new(0, ViolationKind::Empty));
        };
        Self::check_block(hasher, 0, genesis, &BlockHash::sentinel())?;

        let mut prev = genesis;
        for (position, block) in blocks {
            Self::check_block(hasher, position as u64, block, prev.hash())?;
            prev = block;
        }

        Ok(())
    }

    fn check_block(
        hasher: &BlockHasher,
        position: u64,
        block: &Block,
        expected_prev: &BlockHash,
    ) -> Result<(), VerificationError> {
        if block.index() != position {
            return Err(VerificationError::new(position, ViolationKind::BadIndex));
        }
        if block.prev_hash() != expected_prev {
            return Err(VerificationError::new(position, ViolationKind::BadLink));
        }
        if hasher.hash_block(block) != *block.hash() {
            return Err(VerificationError::new(position, ViolationKind::BadHash));
        }
        Ok(())
    }
}
