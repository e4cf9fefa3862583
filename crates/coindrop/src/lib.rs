//! # Coindrop
//!
//! A realtime service for per-room collectible coins. Each configured
//! room gets a randomly placed coin set with a fixed TTL; clients join
//! rooms over WebSocket, collect coins, and see each other's
//! collections broadcast. A small HTTP endpoint serves read-only coin
//! queries.
//!
//! This crate ties the layers together: settings feed the room
//! directory, the directory feeds the coin lifecycle, and the gateway
//! and query endpoint sit on top. The core engine lives in
//! [`coindrop_room`], persistence in [`coindrop_store`], and the wire
//! contract in [`coindrop_protocol`].

mod error;
mod gateway;
mod query;
mod registry;
mod settings;

pub use error::ServerError;
pub use gateway::Gateway;
pub use query::QueryServer;
pub use registry::{ConnId, RoomRegistry};
pub use settings::Settings;
