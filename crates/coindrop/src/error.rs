//! Unified error type for the Coindrop server.

use coindrop_protocol::ProtocolError;
use coindrop_room::RoomError;
use coindrop_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes let `?` convert sub-crate errors
/// automatically at the server boundary.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Encoding or decoding a wire message failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The key-value backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A coin lifecycle operation failed.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The WebSocket handshake or stream failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Binding, accepting, or socket I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is missing, malformed, or inconsistent.
    #[error("invalid settings: {0}")]
    Settings(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use coindrop_protocol::RoomId;

    #[test]
    fn test_from_room_error() {
        let err = RoomError::RoomNotFound(RoomId::new("room1"));
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Room(_)));
        assert!(server_err.to_string().contains("room1"));
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::Unavailable("down".into());
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Store(_)));
    }
}
