//! Wire protocol for Coindrop.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`Coin`], [`ClientEvent`], [`ServerEvent`], etc.): the
//!   structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! The protocol layer sits between transport (raw bytes) and the room
//! core (coin state). It doesn't know about connections, rooms, or the
//! store; it only knows how to serialize and deserialize messages.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientEvent, Coin, CoinId, Position, RoomId, ServerEvent};
