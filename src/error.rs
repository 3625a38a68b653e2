//! Error types for Prettify.
//!
//! This module defines the error types used throughout the crate, providing
//! rich error information for debugging and user feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Prettify operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Prettify.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Error parsing a configuration file.
    #[error("Failed to parse config '{path}': {message}")]
    ConfigParse {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Error writing the host configuration file.
    #[error("Failed to update config '{path}': {message}")]
    ConfigWrite {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// No writable location could be determined for the host configuration.
    #[error("Could not resolve a host configuration path (no home directory)")]
    ConfigPathUnresolved,

    // ========================================================================
    // Event Errors
    // ========================================================================
    /// Error decoding a recorded callback event.
    #[error("Failed to decode event at line {line}: {message}")]
    EventDecode {
        /// 1-based line number in the event stream
        line: usize,
        /// Error message from the decoder
        message: String,
    },

    // ========================================================================
    // Plugin Errors
    // ========================================================================
    /// The requested callback plugin does not exist.
    #[error("Unknown callback plugin '{name}'. Available plugins: {available}")]
    UnknownPlugin {
        /// The requested plugin name
        name: String,
        /// Comma-separated list of available plugin names
        available: String,
    },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_plugin_message() {
        let err = Error::UnknownPlugin {
            name: "sparkle".to_string(),
            available: "prettify, null".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'sparkle'"));
        assert!(msg.contains("prettify, null"));
    }

    #[test]
    fn test_event_decode_message() {
        let err = Error::EventDecode {
            line: 42,
            message: "expected value".to_string(),
        };
        assert!(err.to_string().contains("line 42"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
