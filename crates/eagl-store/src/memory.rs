use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use eagl_types::Chain;

use crate::error::{StoreError, StoreResult};
use crate::traits::ChainStore;

/// In-memory chain store.
///
/// Intended for tests and embedding. The stored chain is cloned on every
/// read and write. Writes can be switched to fail, which lets callers
/// exercise their error paths without touching a real disk.
#[derive(Debug, Default)]
pub struct InMemoryChainStore {
    chain: RwLock<Option<Chain>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryChainStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `persist` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `persist` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// The currently stored chain.
    pub fn stored(&self) -> Option<Chain> {
        self.chain.read().ok().and_then(|c| c.clone())
    }
}

fn poisoned() -> StoreError {
    StoreError::Io(io::Error::other("in-memory store lock poisoned"))
}

impl ChainStore for InMemoryChainStore {
    fn load(&self) -> StoreResult<Option<Chain>> {
        let chain = self.chain.read().map_err(|_| poisoned())?;
        Ok(chain.clone())
    }

    fn persist(&self, chain: &Chain) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::other("simulated write failure")));
        }
        let mut stored = self.chain.write().map_err(|_| poisoned())?;
        *stored = Some(chain.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
