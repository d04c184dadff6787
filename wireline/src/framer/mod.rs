//! Line framing over a duplex transport.
//!
//! [`LineFramer`] turns the byte-level [`Transport`] into a line channel:
//! outgoing commands are cased and framed through a [`FrameTemplate`],
//! incoming bytes accumulate in a buffer and come back out as complete
//! lines. A line ends at `\n`, with one preceding `\r` stripped; when the
//! stream hits EOF, a trailing unterminated tail is flushed as the final
//! line before [`LineEvent::Eof`] is reported.

mod template;

use std::time::{Duration, Instant};

use bytes::BytesMut;
use log::debug;

use crate::error::TransportError;
use crate::transport::{ReadEvent, Transport};

pub use template::FrameTemplate;

/// Outcome of one framed read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A complete decoded line, terminator stripped.
    Line(String),
    /// Non-blocking read with no complete line buffered.
    NoData,
    /// Blocking read that ran out its window.
    Timeout,
    /// The stream is closed and the buffer fully drained. Terminal.
    Eof,
}

/// Line-oriented channel over a boxed [`Transport`].
pub struct LineFramer {
    transport: Box<dyn Transport>,
    template: FrameTemplate,
    uppercase: bool,
    buf: BytesMut,
    eof: bool,
}

impl LineFramer {
    /// Wrap a transport with a frame template and case policy.
    pub fn new(transport: Box<dyn Transport>, template: FrameTemplate, uppercase: bool) -> Self {
        Self {
            transport,
            template,
            uppercase,
            buf: BytesMut::with_capacity(4096),
            eof: false,
        }
    }

    /// Frame and send one command line.
    pub async fn send(&mut self, command: &str) -> Result<(), TransportError> {
        let framed = if self.uppercase {
            self.template.apply(&command.to_uppercase())
        } else {
            self.template.apply(command)
        };
        debug!("send {framed:?}");
        self.transport.write(framed.as_bytes()).await
    }

    /// Blocking read of the next line, bounded by `window`.
    ///
    /// The window covers the whole wait: bytes trickling in without a
    /// terminator still end in [`LineEvent::Timeout`] once the deadline
    /// passes. Never returns [`LineEvent::NoData`].
    pub async fn read_line(&mut self, window: Duration) -> Result<LineEvent, TransportError> {
        let deadline = Instant::now() + window;
        loop {
            if let Some(line) = self.pop_line() {
                return Ok(LineEvent::Line(line));
            }
            if self.eof {
                return Ok(LineEvent::Eof);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(LineEvent::Timeout);
            }
            match self.transport.read_available(remaining).await? {
                ReadEvent::Data(chunk) => self.buf.extend_from_slice(&chunk),
                ReadEvent::Timeout => return Ok(LineEvent::Timeout),
                ReadEvent::Eof => {
                    debug!("end of stream");
                    self.eof = true;
                }
            }
        }
    }

    /// Non-blocking read: drains whatever the OS already has queued and
    /// returns a line only if one is complete.
    pub async fn try_read_line(&mut self) -> Result<LineEvent, TransportError> {
        loop {
            if let Some(line) = self.pop_line() {
                return Ok(LineEvent::Line(line));
            }
            if self.eof {
                return Ok(LineEvent::Eof);
            }
            match self.transport.read_available(Duration::ZERO).await? {
                ReadEvent::Data(chunk) => self.buf.extend_from_slice(&chunk),
                ReadEvent::Timeout => return Ok(LineEvent::NoData),
                ReadEvent::Eof => self.eof = true,
            }
        }
    }

    /// Whether a complete line (or the EOF-terminated tail) is already
    /// waiting, without consuming it.
    pub async fn has_buffered_line(&mut self) -> Result<bool, TransportError> {
        loop {
            if memchr::memchr(b'\n', &self.buf).is_some() {
                return Ok(true);
            }
            if self.eof {
                return Ok(!self.buf.is_empty());
            }
            match self.transport.read_available(Duration::ZERO).await? {
                ReadEvent::Data(chunk) => self.buf.extend_from_slice(&chunk),
                ReadEvent::Timeout => return Ok(false),
                ReadEvent::Eof => self.eof = true,
            }
        }
    }

    /// Close the underlying transport.
    pub async fn close(&mut self) {
        self.transport.close().await;
    }

    fn pop_line(&mut self) -> Option<String> {
        if let Some(at) = memchr::memchr(b'\n', &self.buf) {
            let mut line = self.buf.split_to(at + 1);
            line.truncate(at);
            if line.last() == Some(&b'\r') {
                line.truncate(line.len() - 1);
            }
            return Some(String::from_utf8_lossy(&line).into_owned());
        }
        if self.eof && !self.buf.is_empty() {
            // stream ended mid-line: the partial tail is the final line
            let rest = self.buf.split();
            return Some(String::from_utf8_lossy(&rest).into_owned());
        }
        None
    }
}
