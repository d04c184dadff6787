//! Scripted transport for deterministic tests.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::{ReadEvent, Transport};
use crate::error::TransportError;

/// Transport that replays a fixed script of read events.
///
/// Reads pop the next scripted event and return immediately; an exhausted
/// script reads as a silent device (`Timeout`). Writes and closes are
/// recorded through shared handles so tests can still inspect them after the
/// transport has been boxed away.
pub(crate) struct MockTransport {
    script: VecDeque<ReadEvent>,
    written: Arc<Mutex<Vec<u8>>>,
    closes: Arc<AtomicUsize>,
    fail_next_write: bool,
}

impl MockTransport {
    pub(crate) fn new(script: Vec<ReadEvent>) -> Self {
        Self {
            script: script.into(),
            written: Arc::new(Mutex::new(Vec::new())),
            closes: Arc::new(AtomicUsize::new(0)),
            fail_next_write: false,
        }
    }

    /// A device that never says anything.
    pub(crate) fn silent() -> Self {
        Self::new(Vec::new())
    }

    /// Make the next write fail with a broken pipe.
    pub(crate) fn fail_next_write(mut self) -> Self {
        self.fail_next_write = true;
        self
    }

    /// Scripted data event.
    pub(crate) fn data(text: &str) -> ReadEvent {
        ReadEvent::Data(Bytes::copy_from_slice(text.as_bytes()))
    }

    /// Shared handles to the write log and the close counter.
    pub(crate) fn handles(&self) -> (Arc<Mutex<Vec<u8>>>, Arc<AtomicUsize>) {
        (self.written.clone(), self.closes.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(TransportError::Io(io::ErrorKind::BrokenPipe.into()));
        }
        self.written.lock().unwrap().extend_from_slice(bytes);
        Ok(())
    }

    async fn read_available(&mut self, _window: Duration) -> Result<ReadEvent, TransportError> {
        Ok(self.script.pop_front().unwrap_or(ReadEvent::Timeout))
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
