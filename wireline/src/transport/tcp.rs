//! TCP transport for socket-attached devices.

use std::io;
use std::time::Duration;

use log::debug;
use tokio::net::{self, TcpStream};

use super::StreamTransport;
use crate::error::TransportError;

/// Transport over a TCP connection (Telnet-style raw socket).
pub type TcpTransport = StreamTransport<TcpStream>;

impl StreamTransport<TcpStream> {
    /// Resolve `host` and connect to it, bounded by `timeout`.
    ///
    /// Resolution failure maps to [`TransportError::UnknownHost`]; refusal
    /// and the connect timeout map to [`TransportError::ConnectionFailed`].
    /// The socket is opened with `TCP_NODELAY` set.
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, TransportError> {
        let mut addrs = net::lookup_host((host, port)).await.map_err(|_| {
            TransportError::UnknownHost { host: host.to_string() }
        })?;
        let addr = addrs.next().ok_or_else(|| TransportError::UnknownHost {
            host: host.to_string(),
        })?;

        let target = format!("{host}:{port}");
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| TransportError::ConnectionFailed {
                target: target.clone(),
                source: io::ErrorKind::TimedOut.into(),
            })?
            .map_err(|source| TransportError::ConnectionFailed {
                target: target.clone(),
                source,
            })?;
        stream
            .set_nodelay(true)
            .map_err(|source| TransportError::ConnectionFailed {
                target: target.clone(),
                source,
            })?;

        debug!("connected to {target}");
        Ok(Self::new(stream))
    }
}
