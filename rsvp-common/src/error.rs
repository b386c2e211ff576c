//! Common error types for the RSVP reader
//!
//! The playback engine itself never fails: out-of-range input is clamped.
//! These errors cover the ambient layers around it (configuration, document
//! loading, runtime setup).

use std::path::PathBuf;

use thiserror::Error;

/// Common result type for RSVP reader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the RSVP reader crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML configuration file could not be parsed
    #[error("Failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Document format recognised but not handled by the text ingester
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Operation requires an async runtime that is not available
    #[error("Runtime error: {0}")]
    Runtime(String),
}
