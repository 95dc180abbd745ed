use thiserror::Error;

/// Errors that can arise inside the game engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Wrapper around IO errors (save file creation, locking, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around serde_json serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Returned when loading a save file that does not exist.
    #[error("save file not found: {0}")]
    SaveNotFound(String),

    /// Returned when a save file exists but cannot be parsed.
    #[error("save file corrupt: {0}")]
    SaveCorrupt(String),

    /// Returned when deserializing a snapshot with an unexpected schema version.
    #[error("schema mismatch: expected {expected}, got {found}")]
    SchemaMismatch { expected: u8, found: u8 },

    /// Referenced a room id that does not exist in the world.
    #[error("no such room: {0}")]
    NoSuchRoom(String),
}
