use eagl_types::Chain;

use crate::error::StoreResult;

/// Durable mirror of a chain.
///
/// All implementations must satisfy these invariants:
/// - `persist` replaces the whole stored chain; after it returns `Ok` a
///   subsequent `load` yields exactly that chain.
/// - A failed `persist` leaves the previously stored chain intact.
/// - `load` never verifies or repairs; it only decodes.
/// - All I/O errors are propagated, never silently ignored.
pub trait ChainStore: Send + Sync {
    /// Read the stored chain.
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    /// Returns `Err` on I/O failure or malformed data.
    fn load(&self) -> StoreResult<Option<Chain>>;

    /// Replace the stored chain.
    fn persist(&self, chain: &Chain) -> StoreResult<()>;

    /// Human-readable location, used in logs and error reports.
    fn location(&self) -> String;
}
