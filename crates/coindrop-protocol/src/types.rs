//! Core wire types for Coindrop.
//!
//! Every structure here is serialized to JSON and exchanged with
//! clients, so the serde attributes define the wire contract: event
//! enums are internally tagged on `"event"` and both tags and fields
//! use camelCase.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a room.
///
/// Room ids come from static configuration (e.g. `"room1"`) and double
/// as the key under which the room's coin set is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A unique identifier for a coin within one generation cycle.
///
/// Derived deterministically from the room id and the generation index
/// (`coin_<room>_<index>`), so re-generation may reuse identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinId(pub String);

impl CoinId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CoinId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Coin
// ---------------------------------------------------------------------------

/// An integer-rounded point inside a room's bounding volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

/// One collectible coin: identity plus a 3D position.
///
/// Coins exist only inside a room's coin set; there is no standalone
/// coin state anywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub id: CoinId,
    pub position: Position,
}

// ---------------------------------------------------------------------------
// Realtime events
// ---------------------------------------------------------------------------

/// Events sent by clients to the gateway.
///
/// `#[serde(tag = "event")]` produces internally tagged JSON, e.g.
/// `{"event":"coinCollected","roomId":"room1","coinId":"coin_room1_0"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Join a room's broadcast group.
    JoinRoom { room_id: RoomId },

    /// Request the room's currently available coins.
    GetCoins { room_id: RoomId },

    /// Claim a coin. On success the removal is broadcast to the rest
    /// of the room.
    CoinCollected { room_id: RoomId, coin_id: CoinId },
}

/// Events sent by the gateway to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Reply to `joinRoom`.
    RoomJoined { room_id: RoomId },

    /// Reply to `getCoins`.
    Coins { coins: Vec<Coin> },

    /// Broadcast to a room (excluding the collector) when a coin is
    /// successfully claimed.
    CoinCollected { coin_id: CoinId },

    /// Sent to the offending client when any request fails.
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================
