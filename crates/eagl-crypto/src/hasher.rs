use chrono::{DateTime, Utc};
use eagl_types::{Block, BlockHash};

/// Version tag of the canonical block encoding.
///
/// Every persisted chain was hashed under some version of this encoding.
/// Changing the byte layout below without bumping the tag breaks verification
/// of existing files.
pub const CANONICAL_ENCODING_VERSION: &str = "eagl-block-v1";

/// Canonical byte encoding of a block's hashed fields.
///
/// ```text
/// [index:            u64 LE]
/// [timestamp secs:   i64 LE]   Unix seconds
/// [timestamp nanos:  u32 LE]   sub-second part
/// [payload length:   u64 LE]
/// [payload:          UTF-8 bytes]
/// [prev_hash:        32 bytes]
/// ```
///
/// The encoding does not depend on how the block is formatted in JSON, so a
/// reload always re-hashes to the same digest.
pub fn canonical_bytes(
    index: u64,
    timestamp: &DateTime<Utc>,
    payload: &str,
    prev_hash: &BlockHash,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + 8 + 4 + 8 + payload.len() + 32);
    buf.extend_from_slice(&index.to_le_bytes());
    buf.extend_from_slice(&timestamp.timestamp().to_le_bytes());
    buf.extend_from_slice(&timestamp.timestamp_subsec_nanos().to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    buf.extend_from_slice(payload.as_bytes());
    buf.extend_from_slice(prev_hash.as_bytes());
    buf
}

/// Domain-separated BLAKE3 block hasher.
///
/// The domain tag is prepended to every hash computation, so a block digest
/// can never collide with a digest of the same bytes taken for another
/// purpose or under another encoding version.
pub struct BlockHasher {
    domain: &'static str,
}

impl BlockHasher {
    /// Hasher for the current canonical encoding.
    pub const V1: Self = Self {
        domain: CANONICAL_ENCODING_VERSION,
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> BlockHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        BlockHash::from_bytes(*hasher.finalize().as_bytes())
    }

    /// Hash the four block fields in canonical order.
    pub fn hash_fields(
        &self,
        index: u64,
        timestamp: &DateTime<Utc>,
        payload: &str,
        prev_hash: &BlockHash,
    ) -> BlockHash {
        self.hash(&canonical_bytes(index, timestamp, payload, prev_hash))
    }

    /// Recompute the digest of an existing block from its fields.
    pub fn hash_block(&self, block: &Block) -> BlockHash {
        self.hash_fields(
            block.index(),
            block.timestamp(),
            block.payload(),
            block.prev_hash(),
        )
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Hash block fields under the current canonical encoding.
pub fn compute_hash(
    index: u64,
    timestamp: &DateTime<Utc>,
    payload: &str,
    prev_hash: &BlockHash,
) -> BlockHash {
    BlockHasher::V1.hash_fields(index, timestamp, payload, prev_hash)
}
