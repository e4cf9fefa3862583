//! Storage layer for Coindrop.
//!
//! Coin state lives in a key-value backend, one key per room, and the
//! backend is the single source of truth; there is no in-process
//! cache, so every read and write round-trips.
//!
//! # Key types
//!
//! - [`KeyValueStore`]: the narrow async trait a backend implements
//!   (get/set/delete over opaque bytes, atomic per key)
//! - [`MemoryStore`]: in-process backend for tests and single-node runs
//! - [`RoomStateStore`]: serializes a room's coin set at the room key
//! - [`StoreError`]: what can go wrong

#![allow(async_fn_in_trait)]

mod error;
mod kv;
mod memory;
mod room_state;

pub use error::StoreError;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use room_state::RoomStateStore;
