//! Room coin-state engine for Coindrop.
//!
//! Each configured room gets a generated set of coins placed randomly
//! inside its bounding volume. The set lives in the room-state store,
//! shrinks as clients collect coins, and is deleted wholesale when its
//! TTL elapses.
//!
//! # Key types
//!
//! - [`RoomConfig`] / [`Bounds`]: static per-room settings
//! - [`RoomDirectory`]: immutable id-to-config lookup, injected at
//!   construction
//! - [`generate_coins`]: the spatial generator
//! - [`CoinLifecycle`]: generation, listing, collection, expiration
//! - [`RoomError`]: what can go wrong

mod config;
mod error;
mod generator;
mod lifecycle;

pub use config::{Bounds, RoomConfig, RoomDirectory};
pub use error::RoomError;
pub use generator::generate_coins;
pub use lifecycle::CoinLifecycle;
