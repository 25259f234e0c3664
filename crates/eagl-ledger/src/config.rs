use std::path::PathBuf;

use eagl_store::{LoadOptions, DEFAULT_GENESIS_PAYLOAD};
use serde::{Deserialize, Serialize};

/// Where the chain lives and how it is opened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Chain file path.
    pub data_file: PathBuf,
    /// Payload of the genesis block for a new chain.
    pub genesis_payload: String,
    /// Verify the stored chain when opening.
    pub verify_on_load: bool,
}

impl LedgerConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            genesis_payload: self.genesis_payload.clone(),
            verify: self.verify_on_load,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("blockchain.json"),
            genesis_payload: DEFAULT_GENESIS_PAYLOAD.to_string(),
            verify_on_load: true,
        }
    }
}
