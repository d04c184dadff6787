//! Duplex byte transports for command/response devices.
//!
//! A [`Transport`] is a byte stream the device sits behind: a TCP socket
//! speaking Telnet-style raw lines, or a local serial port. Everything above
//! this layer works in decoded lines; the transport's only job is moving
//! bytes with a bounded wait.

mod duplex;
mod serial;
mod tcp;

#[cfg(test)]
pub(crate) mod mock;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::TransportError;

pub use duplex::StreamTransport;
pub use serial::SerialTransport;
pub use tcp::TcpTransport;

/// Outcome of a single timed read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadEvent {
    /// Bytes arrived; never empty.
    Data(Bytes),
    /// The window elapsed with nothing to read.
    Timeout,
    /// The peer closed the stream. Terminal: every later read repeats it.
    Eof,
}

/// Byte-level duplex stream with timed reads.
///
/// A zero-duration window turns [`read_available`](Transport::read_available)
/// into a poll: it returns whatever the OS already has queued, or
/// [`ReadEvent::Timeout`] without suspending.
#[async_trait]
pub trait Transport: Send {
    /// Write all of `bytes` to the stream.
    async fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Read whatever bytes are available within `window`.
    async fn read_available(&mut self, window: Duration) -> Result<ReadEvent, TransportError>;

    /// Close the transport. Idempotent; later reads and writes fail fast
    /// with [`TransportError::Closed`].
    async fn close(&mut self);
}
