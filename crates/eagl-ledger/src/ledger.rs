use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use eagl_crypto::ChainVerifier;
use eagl_store::{create_next, load_or_init, ChainStore, FileChainStore, LoadOptions, StoreError};
use eagl_types::{Block, Chain};
use tracing::{error, info, warn};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::traits::{Head, LedgerReader, LedgerWriter};

/// The node's ledger: sole owner of the chain for the life of the process.
///
/// A single `RwLock` guards the in-memory chain. `append` holds the write
/// lock across building the block, pushing it, and persisting the whole
/// chain; if the persist fails the block is popped again before the lock is
/// released. Readers therefore only ever see blocks that are on disk.
pub struct Ledger {
    store: Arc<dyn ChainStore>,
    chain: RwLock<Chain>,
    closing: AtomicBool,
}

impl Ledger {
    /// Open the file-backed ledger described by `config`.
    pub fn open(config: &LedgerConfig) -> LedgerResult<Self> {
        let store = FileChainStore::new(&config.data_file);
        Self::with_store(Arc::new(store), &config.load_options())
    }

    /// Open a ledger over an arbitrary store.
    pub fn with_store(store: Arc<dyn ChainStore>, options: &LoadOptions) -> LedgerResult<Self> {
        let chain = load_or_init(store.as_ref(), options)?;
        if let Some(tip) = chain.last() {
            info!(
                location = %store.location(),
                blocks = chain.len(),
                tip = %tip.hash().short_hex(),
                "ledger opened"
            );
        }
        Ok(Self {
            store,
            chain: RwLock::new(chain),
            closing: AtomicBool::new(false),
        })
    }

    /// Stop accepting appends. Does not wait; see [`Ledger::shutdown`].
    pub fn close(&self) {
        if !self.closing.swap(true, Ordering::SeqCst) {
            info!("ledger closing; new appends are rejected");
        }
    }

    /// Stop accepting appends and wait for any in-flight append to finish.
    ///
    /// Reads keep working afterwards. Safe to call more than once.
    pub fn shutdown(&self) -> LedgerResult<()> {
        self.close();
        // Taking the write lock once means every append that got in before
        // the flag flipped has completed.
        let chain = self.chain.write().map_err(|_| LedgerError::LockPoisoned)?;
        info!(blocks = chain.len(), "ledger drained");
        Ok(())
    }

    /// Returns `true` once `close` or `shutdown` has been called.
    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::SeqCst)
    }

    /// Location of the durable mirror.
    pub fn location(&self) -> String {
        self.store.location()
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, Chain>> {
        self.chain.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn reject_if_closing(&self) -> LedgerResult<()> {
        if self.is_closing() {
            warn!("append rejected: ledger is shutting down");
            return Err(LedgerError::ShuttingDown);
        }
        Ok(())
    }
}

impl LedgerWriter for Ledger {
    fn append(&self, payload: &str) -> LedgerResult<Block> {
        self.reject_if_closing()?;
        let mut chain = self.chain.write().map_err(|_| LedgerError::LockPoisoned)?;
        // Shutdown may have started while this call waited for the lock.
        self.reject_if_closing()?;

        let block = create_next(&chain, payload).inspect_err(|e| {
            if matches!(e, StoreError::EmptyChain) {
                error!("ledger chain is empty after open; this is a bug");
            }
        })?;

        chain.push(block.clone());
        if let Err(e) = self.store.persist(&chain) {
            chain.pop();
            warn!(index = block.index(), error = %e, "append rolled back: persist failed");
            return Err(e.into());
        }

        info!(
            index = block.index(),
            hash = %block.hash().short_hex(),
            payload_len = block.payload().len(),
            "block appended"
        );
        Ok(block)
    }
}

impl LedgerReader for Ledger {
    fn latest(&self) -> LedgerResult<Block> {
        Ok(self.head()?.block)
    }

    fn head(&self) -> LedgerResult<Head> {
        let chain = self.read()?;
        let block = chain.last().cloned().ok_or_else(|| {
            error!("ledger chain is empty after open; this is a bug");
            LedgerError::Store(StoreError::EmptyChain)
        })?;
        Ok(Head {
            length: chain.len(),
            block,
        })
    }

    fn get_by_index(&self, index: u64) -> LedgerResult<Option<Block>> {
        Ok(self.read()?.get(index).cloned())
    }

    fn len(&self) -> LedgerResult<usize> {
        Ok(self.read()?.len())
    }

    fn verify_chain(&self) -> LedgerResult<usize> {
        let chain = self.read()?;
        ChainVerifier::verify(&chain)?;
        Ok(chain.len())
    }

    fn snapshot(&self) -> LedgerResult<Chain> {
        Ok(self.read()?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eagl_crypto::ViolationKind;
    use eagl_store::InMemoryChainStore;
    use std::collections::HashSet;
    use std::path::Path;

    fn file_ledger(dir: &Path) -> Ledger {
        let config = LedgerConfig {
            data_file: dir.join("blockchain.json"),
            ..LedgerConfig::default()
        };
        Ledger::open(&config).unwrap()
    }

    fn memory_ledger() -> (Arc<InMemoryChainStore>, Ledger) {
        let store = Arc::new(InMemoryChainStore::new());
        let ledger = Ledger::with_store(store.clone(), &LoadOptions::default()).unwrap();
        (store, ledger)
    }

    #[test]
    fn fresh_ledger_has_genesis() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = file_ledger(dir.path());
        assert_eq!(ledger.len().unwrap(), 1);
        let genesis = ledger.latest().unwrap();
        assert_eq!(genesis.index(), 0);
        assert!(genesis.prev_hash().is_sentinel());
        ledger.verify_chain().unwrap();
    }

    #[test]
    fn sequential_appends() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = file_ledger(dir.path());
        for i in 1..=25u64 {
            let block = ledger.append(&format!("tx-{i}")).unwrap();
            assert_eq!(block.index(), i);
            assert_eq!(ledger.latest().unwrap(), block);
        }
        let chain = ledger.snapshot().unwrap();
        assert_eq!(chain.len(), 26);
        for (i, block) in chain.iter().enumerate() {
            assert_eq!(block.index(), i as u64);
        }
        assert_eq!(ledger.verify_chain().unwrap(), 26);
    }

    #[test]
    fn append_links_to_previous_tip() {
        let (_, ledger) = memory_ledger();
        let genesis = ledger.latest().unwrap();
        let block = ledger.append("hello").unwrap();
        assert_eq!(block.index(), 1);
        assert_eq!(block.prev_hash(), genesis.hash());
        assert_eq!(block.payload(), "hello");
    }

    #[test]
    fn get_by_index_out_of_range_is_none() {
        let (_, ledger) = memory_ledger();
        ledger.append("a").unwrap();
        assert!(ledger.get_by_index(0).unwrap().is_some());
        assert!(ledger.get_by_index(1).unwrap().is_some());
        assert!(ledger.get_by_index(2).unwrap().is_none());
        assert!(ledger.get_by_index(u64::MAX).unwrap().is_none());
    }

    #[test]
    fn every_append_is_persisted() {
        let (store, ledger) = memory_ledger();
        ledger.append("a").unwrap();
        ledger.append("b").unwrap();
        // genesis write + two appends
        assert_eq!(store.write_count(), 3);
        assert_eq!(store.stored().unwrap(), ledger.snapshot().unwrap());
    }

    #[test]
    fn failed_persist_rolls_back() {
        let (store, ledger) = memory_ledger();
        ledger.append("kept").unwrap();

        store.set_fail_writes(true);
        let err = ledger.append("lost").unwrap_err();
        assert!(matches!(err, LedgerError::Store(StoreError::Io(_))));
        assert_eq!(ledger.len().unwrap(), 2);
        assert_eq!(ledger.latest().unwrap().payload(), "kept");

        store.set_fail_writes(false);
        let block = ledger.append("retry").unwrap();
        assert_eq!(block.index(), 2);
        ledger.verify_chain().unwrap();
        assert_eq!(store.stored().unwrap(), ledger.snapshot().unwrap());
    }

    #[test]
    fn append_past_max_index_fails_and_reads_keep_working() {
        let genesis = eagl_store::create_genesis("g");
        let ts = eagl_types::timestamp::now();
        let hash = eagl_crypto::compute_hash(u64::MAX, &ts, "tip", genesis.hash());
        let tip = Block::from_parts(u64::MAX, ts, "tip", *genesis.hash(), hash);

        let store = Arc::new(InMemoryChainStore::new());
        store.persist(&Chain::from_blocks(vec![genesis, tip.clone()])).unwrap();
        let options = LoadOptions {
            verify: false,
            ..LoadOptions::default()
        };
        let ledger = Ledger::with_store(store.clone(), &options).unwrap();

        let err = ledger.append("boom").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Store(StoreError::IndexOverflow { tip }) if tip == u64::MAX
        ));
        assert_eq!(ledger.latest().unwrap(), tip);
        assert_eq!(ledger.len().unwrap(), 2);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn reopen_restores_persisted_chain() {
        let dir = tempfile::tempdir().unwrap();
        let before = {
            let ledger = file_ledger(dir.path());
            ledger.append("one").unwrap();
            ledger.append("two").unwrap();
            ledger.snapshot().unwrap()
        };
        let ledger = file_ledger(dir.path());
        assert_eq!(ledger.snapshot().unwrap(), before);
        assert_eq!(ledger.append("three").unwrap().index(), 3);
    }

    #[test]
    fn corrupt_file_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blockchain.json");
        {
            let ledger = file_ledger(dir.path());
            ledger.append("hello").unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, text.replace("\"hello\"", "\"hallo\"")).unwrap();

        let config = LedgerConfig {
            data_file: path,
            ..LedgerConfig::default()
        };
        match Ledger::open(&config) {
            Err(LedgerError::Store(StoreError::CorruptStorage { source, .. })) => {
                assert_eq!(source.index, 1);
                assert_eq!(source.kind, ViolationKind::BadHash);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("corrupt chain was accepted"),
        }
    }

    #[test]
    fn shutdown_rejects_new_appends_but_allows_reads() {
        let (_, ledger) = memory_ledger();
        ledger.append("before").unwrap();
        ledger.shutdown().unwrap();
        assert!(ledger.is_closing());

        assert!(matches!(ledger.append("after"), Err(LedgerError::ShuttingDown)));
        assert_eq!(ledger.len().unwrap(), 2);
        assert_eq!(ledger.latest().unwrap().payload(), "before");
        ledger.shutdown().unwrap();
    }

    #[test]
    fn close_takes_effect_before_drain() {
        let (_, ledger) = memory_ledger();
        ledger.close();
        assert!(matches!(ledger.append("x"), Err(LedgerError::ShuttingDown)));
        ledger.shutdown().unwrap();
        assert_eq!(ledger.len().unwrap(), 1);
    }

    #[test]
    fn head_is_consistent() {
        let (_, ledger) = memory_ledger();
        ledger.append("a").unwrap();
        let head = ledger.head().unwrap();
        assert_eq!(head.length, 2);
        assert_eq!(head.block.index(), 1);
        assert_eq!(head.block, ledger.latest().unwrap());
    }

    #[test]
    fn concurrent_appends_are_serialized() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 8;

        let dir = tempfile::tempdir().unwrap();
        let ledger = file_ledger(dir.path());
        let initial = ledger.len().unwrap();

        std::thread::scope(|s| {
            for t in 0..THREADS {
                let ledger = &ledger;
                s.spawn(move || {
                    for i in 0..PER_THREAD {
                        ledger.append(&format!("t{t}-{i}")).unwrap();
                    }
                });
            }
            // Readers run alongside and must never see a broken chain.
            for _ in 0..2 {
                let ledger = &ledger;
                s.spawn(move || {
                    for _ in 0..50 {
                        let chain = ledger.snapshot().unwrap();
                        assert!(ChainVerifier::verify(&chain).is_ok());
                    }
                });
            }
        });

        let chain = ledger.snapshot().unwrap();
        assert_eq!(chain.len(), initial + THREADS * PER_THREAD);
        let indices: HashSet<u64> = chain.iter().map(Block::index).collect();
        assert_eq!(indices.len(), chain.len());
        ledger.verify_chain().unwrap();

        let payloads: HashSet<&str> = chain.iter().skip(1).map(Block::payload).collect();
        assert_eq!(payloads.len(), THREADS * PER_THREAD);

        drop(chain);
        let reopened = file_ledger(dir.path());
        assert_eq!(reopened.snapshot().unwrap(), ledger.snapshot().unwrap());
    }

    #[test]
    fn shutdown_waits_for_in_flight_appends() {
        let (_, ledger) = memory_ledger();
        std::thread::scope(|s| {
            let writer = s.spawn(|| {
                let mut ok = 0;
                for i in 0..200 {
                    match ledger.append(&format!("p{i}")) {
                        Ok(_) => ok += 1,
                        Err(LedgerError::ShuttingDown) => break,
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
                ok
            });
            ledger.shutdown().unwrap();
            let appended = writer.join().unwrap();
            // Everything that succeeded is in the chain; nothing after shutdown is.
            assert_eq!(ledger.len().unwrap(), 1 + appended);
        });
        ledger.verify_chain().unwrap();
    }
}
