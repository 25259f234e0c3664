use eagl_crypto::VerificationError;
use eagl_store::StoreError;

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("integrity violation: {0}")]
    Verification(#[from] VerificationError),

    #[error("ledger is shutting down; no new appends are accepted")]
    ShuttingDown,

    #[error("ledger lock poisoned")]
    LockPoisoned,
}

pub type LedgerResult<T> = Result<T, LedgerError>;
