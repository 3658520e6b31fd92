//! # Error Types
//!
//! This module defines error types used throughout the caixa console.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for caixa operations
#[derive(Debug, Error)]
pub enum CaixaError {
    /// The vendor driver library could not be loaded
    #[error("Failed to load driver library {}: {source}", path.display())]
    Library {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// The driver library does not export an expected function
    #[error("Driver library has no export named {name}: {source}")]
    MissingSymbol {
        name: &'static str,
        #[source]
        source: libloading::Error,
    },

    /// A driver call returned a non-zero status code.
    ///
    /// The code is vendor-defined and carried verbatim; caixa never
    /// interprets it beyond zero vs non-zero.
    #[error("{call} failed with driver code {code}")]
    Driver { call: &'static str, code: i32 },

    /// A connection-dependent operation was attempted while disconnected
    #[error("No connection open")]
    NotConnected,

    /// Configure or connect was attempted while a connection is open
    #[error("A connection is already open")]
    AlreadyConnected,

    /// Text contained an interior NUL byte and cannot cross the C boundary
    #[error("Text contains a NUL byte and cannot be passed to the driver")]
    InvalidText,

    /// A fiscal XML payload file could not be read
    #[error("Failed to read payload {}: {source}", path.display())]
    Payload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
