//! Startup path: load a stored chain or create one.

use eagl_crypto::ChainVerifier;
use eagl_types::Chain;
use tracing::{error, info};

use crate::builder::{create_genesis, DEFAULT_GENESIS_PAYLOAD};
use crate::error::{StoreError, StoreResult};
use crate::traits::ChainStore;

/// Options for [`load_or_init`].
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Payload of the genesis block written when nothing is stored yet.
    pub genesis_payload: String,
    /// Verify a loaded chain before returning it.
    pub verify: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            genesis_payload: DEFAULT_GENESIS_PAYLOAD.to_string(),
            verify: true,
        }
    }
}

/// Load the stored chain, or create and persist a genesis-only chain if the
/// store is empty.
///
/// Malformed data fails with [`StoreError::Parse`]; data that decodes but
/// does not verify fails with [`StoreError::CorruptStorage`]. Neither case
/// falls back to a fresh chain.
pub fn load_or_init<S: ChainStore + ?Sized>(store: &S, options: &LoadOptions) -> StoreResult<Chain> {
    let location = store.location();

    let Some(chain) = store.load()? else {
        let chain = Chain::from_blocks(vec![create_genesis(&options.genesis_payload)]);
        store.persist(&chain)?;
        info!(%location, "initialized new chain with genesis block");
        return Ok(chain);
    };

    if options.verify {
        if let Err(source) = ChainVerifier::verify(&chain) {
            error!(%location, index = source.index, kind = %source.kind, "stored chain failed verification");
            return Err(StoreError::CorruptStorage { location, source });
        }
    } else if chain.is_empty() {
        return Err(StoreError::EmptyChain);
    }

    info!(%location, blocks = chain.len(), verified = options.verify, "loaded chain");
    Ok(chain)
}
