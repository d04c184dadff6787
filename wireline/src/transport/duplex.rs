//! Generic transport over any async byte stream.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{ReadEvent, Transport};
use crate::error::TransportError;

/// Upper bound on how many bytes one read pulls off the stream.
const READ_CHUNK: usize = 4096;

/// [`Transport`] over any `AsyncRead + AsyncWrite` stream.
///
/// The TCP and serial transports are aliases of this type; tests run it over
/// an in-memory duplex pipe. [`close`](Transport::close) drops the stream,
/// after which every operation fails fast with [`TransportError::Closed`].
pub struct StreamTransport<S> {
    stream: Option<S>,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already-connected stream.
    pub fn new(stream: S) -> Self {
        Self { stream: Some(stream) }
    }

    /// Whether the transport is still open.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;
        stream.write_all(bytes).await?;
        stream.flush().await?;
        trace!("wrote {} byte(s)", bytes.len());
        Ok(())
    }

    async fn read_available(&mut self, window: Duration) -> Result<ReadEvent, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;
        let mut chunk = BytesMut::with_capacity(READ_CHUNK);
        match tokio::time::timeout(window, stream.read_buf(&mut chunk)).await {
            Err(_) => Ok(ReadEvent::Timeout),
            Ok(Ok(0)) => Ok(ReadEvent::Eof),
            Ok(Ok(n)) => {
                trace!("read {} byte(s)", n);
                Ok(ReadEvent::Data(chunk.freeze()))
            }
            Ok(Err(err)) => Err(TransportError::Io(err)),
        }
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(err) = stream.shutdown().await {
                debug!("shutdown on close failed: {err}");
            }
        }
    }
}
