//! # Wireline
//!
//! Async interactive terminal engine for line-oriented command/response
//! devices behind a TCP socket or a local serial port.
//!
//! Devices in this family, such as lab instruments and embedded monitors,
//! take one line and answer with zero or more lines. Nothing in the byte
//! stream marks the end of a reply, so collection is driven by a line count
//! or a time budget. Wireline turns the raw byte stream into a
//! line channel, frames outgoing commands with a configurable terminator,
//! collects replies under a count-or-drain policy, and runs an interactive
//! loop on top.
//!
//! ## Features
//!
//! - TCP (Telnet-style raw socket) and serial transports behind one trait
//! - Line framing with CRLF-tolerant decoding and EOF tail flushing
//! - Fixed-count or drain-until-quiet reply collection; timeouts are
//!   outcomes, not errors
//! - Interactive loop with comment/escape directives, unsolicited-output
//!   draining, and a goodbye sentinel
//! - Listen-only mode for receive-only monitoring
//! - Pluggable input front ends via [`InputSource`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use wireline::{CollectPolicy, FrameTemplate, Session, TcpTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wireline::Error> {
//!     let transport = TcpTransport::connect("192.0.2.17", 23, Duration::from_secs(2)).await?;
//!
//!     let mut session = Session::builder()
//!         .template(FrameTemplate::parse("{0}\r\n")?)
//!         .policy(CollectPolicy::fixed(1, Duration::from_millis(1000)))
//!         .build(Box::new(transport));
//!
//!     let response = session.send_once("*IDN?").await?;
//!     println!("{response}");
//!
//!     session.close().await;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod framer;
pub mod session;
pub mod transport;

// Re-export main types for convenience
pub use error::{Error, FramerError, Result, SessionError, TransportError};
pub use framer::{FrameTemplate, LineEvent, LineFramer};
pub use session::{
    collect_response, CollectMode, CollectOutcome, CollectPolicy, InputSource, Response, Session,
    SessionBuilder, SessionConfig, DEFAULT_PROMPT,
};
pub use transport::{ReadEvent, SerialTransport, StreamTransport, TcpTransport, Transport};
