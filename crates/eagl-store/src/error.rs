use eagl_crypto::VerificationError;

/// Errors from block store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Persisted data is not a well-formed chain.
    #[error("malformed chain data: {reason}")]
    Parse { reason: String },

    /// A chain could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Persisted data parsed but failed integrity verification.
    #[error("corrupt storage at {location}: {source}")]
    CorruptStorage {
        location: String,
        source: VerificationError,
    },

    /// A successor block was requested for a chain with no blocks.
    #[error("cannot extend an empty chain")]
    EmptyChain,

    /// The tip already carries the largest representable index.
    #[error("block index overflow: tip index is {tip}")]
    IndexOverflow { tip: u64 },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
