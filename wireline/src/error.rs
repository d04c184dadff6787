//! Error types for wireline.

use std::io;
use thiserror::Error;

/// Main error type for wireline operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Line framing errors
    #[error("Framer error: {0}")]
    Framer(#[from] FramerError),

    /// Session-level errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Transport layer errors (resolving, connecting, reading, writing).
///
/// Timeouts and EOF are not errors here: they are expected outcomes carried
/// by [`ReadEvent`](crate::transport::ReadEvent).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Host name did not resolve
    #[error("Unknown host '{host}'")]
    UnknownHost { host: String },

    /// Failed to open the transport
    #[error("Connection failed to {target}: {source}")]
    ConnectionFailed {
        target: String,
        #[source]
        source: io::Error,
    },

    /// Transport used after close
    #[error("Transport is closed")]
    Closed,

    /// I/O error on an open transport
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Line framer errors.
#[derive(Error, Debug)]
pub enum FramerError {
    /// Frame template must contain the placeholder exactly once
    #[error("Invalid frame template {pattern:?}: expected exactly one {{0}} placeholder")]
    InvalidTemplate { pattern: String },
}

/// Session layer errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session used after close
    #[error("Session is closed")]
    Closed,

    /// Failed to write to the output sink
    #[error("Output failed: {0}")]
    Output(#[source] io::Error),
}

/// Result type alias using wireline's Error.
pub type Result<T> = std::result::Result<T, Error>;
