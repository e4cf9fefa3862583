//! Room configuration: bounding volumes and the room directory.

use std::collections::HashMap;

use coindrop_protocol::{Position, RoomId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// An axis-aligned bounding volume, inclusive on every bound.
///
/// Invariant: `min ≤ max` per axis. The directory rejects volumes that
/// violate it; downstream code (the generator in particular) assumes
/// it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: i64,
    pub x_max: i64,
    pub y_min: i64,
    pub y_max: i64,
    pub z_min: i64,
    pub z_max: i64,
}

impl Bounds {
    /// A cube spanning `[min, max]` on all three axes.
    pub fn cube(min: i64, max: i64) -> Self {
        Self {
            x_min: min,
            x_max: max,
            y_min: min,
            y_max: max,
            z_min: min,
            z_max: max,
        }
    }

    /// Returns `true` if `min ≤ max` holds on every axis.
    pub fn is_well_formed(&self) -> bool {
        self.x_min <= self.x_max && self.y_min <= self.y_max && self.z_min <= self.z_max
    }

    /// Returns `true` if the position lies inside the volume,
    /// bounds included.
    pub fn contains(&self, pos: &Position) -> bool {
        (self.x_min..=self.x_max).contains(&pos.x)
            && (self.y_min..=self.y_max).contains(&pos.y)
            && (self.z_min..=self.z_max).contains(&pos.z)
    }
}

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Static configuration for one room. Immutable after process start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Unique room identifier, also the room's key in the store.
    pub id: RoomId,

    /// How many coins each generation cycle produces.
    pub coin_count: usize,

    /// Volume the coins are placed in.
    pub area: Bounds,
}

// ---------------------------------------------------------------------------
// RoomDirectory
// ---------------------------------------------------------------------------

/// Immutable lookup from room id to configuration.
///
/// Built once at startup and injected into [`CoinLifecycle`]; there is
/// no way to add or remove rooms at runtime. Lookup is O(1); iteration
/// preserves configuration order so startup generation is predictable.
///
/// [`CoinLifecycle`]: crate::CoinLifecycle
#[derive(Debug, Clone)]
pub struct RoomDirectory {
    rooms: HashMap<RoomId, RoomConfig>,
    order: Vec<RoomId>,
}

impl RoomDirectory {
    /// Builds a directory from a list of room configurations.
    ///
    /// # Errors
    /// Rejects duplicate room ids and malformed bounding volumes, both
    /// configuration mistakes that should abort startup.
    pub fn new(configs: Vec<RoomConfig>) -> Result<Self, String> {
        let mut rooms = HashMap::with_capacity(configs.len());
        let mut order = Vec::with_capacity(configs.len());

        for config in configs {
            if !config.area.is_well_formed() {
                return Err(format!(
                    "room {}: bounding volume has min > max on some axis",
                    config.id
                ));
            }
            if rooms.contains_key(&config.id) {
                return Err(format!("duplicate room id: {}", config.id));
            }
            order.push(config.id.clone());
            rooms.insert(config.id.clone(), config);
        }

        Ok(Self { rooms, order })
    }

    /// Looks up a room's configuration.
    pub fn get(&self, room_id: &RoomId) -> Option<&RoomConfig> {
        self.rooms.get(room_id)
    }

    /// Returns `true` if the room id is configured.
    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Iterates configurations in the order they were declared.
    pub fn iter(&self) -> impl Iterator<Item = &RoomConfig> {
        self.order.iter().map(|id| &self.rooms[id])
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
