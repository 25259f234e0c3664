//! Single-file chain storage.
//!
//! The whole chain lives in one JSON file. Writes go to a temporary file in
//! the same directory, are flushed to disk, and then renamed over the target,
//! so a crash mid-write leaves either the previous chain or the new one. The
//! directory is synced after the rename so the new name survives power loss.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use eagl_types::Chain;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::builder::create_genesis;
use crate::codec;
use crate::error::StoreResult;
use crate::traits::ChainStore;

/// Atomically replace the chain file at `path`.
///
/// Parent directories are created as needed.
pub fn persist(path: &Path, chain: &Chain) -> StoreResult<()> {
    let bytes = codec::serialize(chain)?;
    let dir = parent_dir(path);
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    sync_dir(dir)?;

    debug!(
        path = %path.display(),
        blocks = chain.len(),
        bytes = bytes.len(),
        "chain persisted"
    );
    Ok(())
}

/// Make a completed rename in `dir` durable.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// [`ChainStore`] backed by a single JSON file.
#[derive(Clone, Debug)]
pub struct FileChainStore {
    path: PathBuf,
}

impl FileChainStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a chain file is present.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Start over with a fresh genesis chain.
    ///
    /// An existing file is kept next to the original as
    /// `<name>.corrupt-<unix-seconds>` rather than deleted. Returns the new
    /// chain and, if a file was moved aside, its new path.
    ///
    /// This discards history and must only run on an explicit operator
    /// request.
    pub fn reinitialize(&self, genesis_payload: &str) -> StoreResult<(Chain, Option<PathBuf>)> {
        let moved = if self.path.exists() {
            let target = self.quarantine_path();
            fs::rename(&self.path, &target)?;
            warn!(
                from = %self.path.display(),
                to = %target.display(),
                "existing chain file moved aside"
            );
            Some(target)
        } else {
            None
        };

        let chain = Chain::from_blocks(vec![create_genesis(genesis_payload)]);
        persist(&self.path, &chain)?;
        Ok((chain, moved))
    }

    /// First free `<name>.corrupt-<unix-seconds>[-<n>]` next to the chain file.
    fn quarantine_path(&self) -> PathBuf {
        let secs = chrono::Utc::now().timestamp();
        let mut base = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "chain".into());
        base.push(format!(".corrupt-{secs}"));

        let mut candidate = self.path.with_file_name(&base);
        let mut n = 1u32;
        while candidate.exists() {
            let mut name = base.clone();
            name.push(format!("-{n}"));
            candidate = self.path.with_file_name(name);
            n += 1;
        }
        candidate
    }
}

impl ChainStore for FileChainStore {
    fn load(&self) -> StoreResult<Option<Chain>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %self.path.display(), bytes = bytes.len(), "chain file read");
        codec::deserialize(&bytes).map(Some)
    }

    fn persist(&self, chain: &Chain) -> StoreResult<()> {
        persist(&self.path, chain)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
