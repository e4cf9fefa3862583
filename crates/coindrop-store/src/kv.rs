//! The backend trait: a minimal async key-value interface.

use std::future::Future;

use crate::StoreError;

/// A key-value backend with atomic single-key operations.
///
/// This is the seam between Coindrop and whatever actually holds the
/// data (an in-process map, Redis, etc.). The contract is deliberately
/// narrow:
///
/// - `set` overwrites atomically at the key level; readers never see a
///   partial value.
/// - `delete` of a missing key is not an error.
/// - No transactions, no multi-key operations; callers that need
///   read-modify-write consistency must serialize above this trait.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the value at `key`, or `None` if the key is absent.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StoreError>> + Send;

    /// Writes `value` at `key`, replacing any existing value.
    fn set(
        &self,
        key: &str,
        value: Vec<u8>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes `key`. Succeeds whether or not the key existed.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}
