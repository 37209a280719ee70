//! Error types for the Hearth core library.
//!
//! Only construction and persistence can fail. Lookups and adjustments on
//! the live engines degrade to defaults or no-ops instead of erroring.

use thiserror::Error;

/// Top-level error type for all Hearth core operations.
#[derive(Error, Debug)]
pub enum HearthError {
    /// An event manager was built without any events to pick from.
    #[error("Environment event catalog is empty")]
    EmptyEventCatalog,

    /// A social move reads or writes an attribute the network does not track.
    #[error("Social move '{mov}' references unknown attribute '{attribute}'")]
    UnknownAttribute {
        /// Name of the offending move.
        mov: String,
        /// Attribute name the move refers to.
        attribute: String,
    },

    /// Two moves in one catalog share a name.
    #[error("Duplicate social move: {0}")]
    DuplicateMove(String),

    /// SQLite persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, HearthError>;
