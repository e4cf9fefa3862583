//! Room coin-state persistence over a [`KeyValueStore`].

use coindrop_protocol::{Coin, RoomId};

use crate::{KeyValueStore, StoreError};

/// Stores each room's coin set as the sole value under the room's key.
///
/// This is a thin serialization wrapper: no caching, no coalescing.
/// The backend stays the single source of truth, and `save` relies on
/// the backend's atomic single-key write for consistency.
#[derive(Debug, Clone)]
pub struct RoomStateStore<S> {
    backend: S,
}

impl<S: KeyValueStore> RoomStateStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Loads the room's coin set, or `None` if no set is stored.
    ///
    /// Absence means the same thing regardless of cause: expired,
    /// never generated, or unknown room.
    pub async fn load(&self, room_id: &RoomId) -> Result<Option<Vec<Coin>>, StoreError> {
        let Some(bytes) = self.backend.get(room_id.as_str()).await? else {
            return Ok(None);
        };
        let coins = serde_json::from_slice(&bytes).map_err(StoreError::Decode)?;
        Ok(Some(coins))
    }

    /// Overwrites the room's coin set.
    pub async fn save(&self, room_id: &RoomId, coins: &[Coin]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(coins).map_err(StoreError::Encode)?;
        self.backend.set(room_id.as_str(), bytes).await?;
        tracing::trace!(room_id = %room_id, coins = coins.len(), "coin set saved");
        Ok(())
    }

    /// Deletes the room's coin set. Absence of the key is not an error.
    pub async fn clear(&self, room_id: &RoomId) -> Result<(), StoreError> {
        self.backend.delete(room_id.as_str()).await
    }
}
