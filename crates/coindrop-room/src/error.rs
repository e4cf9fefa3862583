//! Error types for the room coin-state engine.

use coindrop_protocol::{CoinId, RoomId};
use coindrop_store::StoreError;

/// Errors that can occur during coin lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room id is not in the static configuration, or the room has
    /// no persisted coin state. The store cannot distinguish "expired"
    /// from "never generated"; absence of the key reports as this
    /// variant either way.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// The collect target is no longer (or never was) in the room's set.
    #[error("coin {0} not found")]
    CoinNotFound(CoinId),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
