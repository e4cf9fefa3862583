//! Error types for the storage layer.

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Serializing a coin set for storage failed.
    #[error("failed to encode coin set: {0}")]
    Encode(#[source] serde_json::Error),

    /// A stored value could not be parsed back into a coin set.
    /// Indicates a corrupt key or a writer speaking another format.
    #[error("failed to decode coin set: {0}")]
    Decode(#[source] serde_json::Error),
}
