//! Response collection policies.
//!
//! Nothing in the byte stream says when a reply is finished, so collection
//! is driven by a line count or a time budget: read exactly `n` lines, or
//! drain until the device goes quiet for one window. Falling short is data,
//! not an error.

use std::time::{Duration, Instant};

use log::debug;

use super::response::{CollectOutcome, Response};
use crate::error::TransportError;
use crate::framer::{LineEvent, LineFramer};

/// How the reply to one command is gathered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectMode {
    /// Read exactly this many lines, each within one window.
    Fixed(usize),
    /// Read until the device stays quiet for one window.
    Drain,
}

/// Collection mode plus the per-line wait window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectPolicy {
    pub mode: CollectMode,
    pub window: Duration,
}

impl CollectPolicy {
    /// Expect exactly `count` lines; zero normalizes to [`CollectMode::Drain`].
    pub fn fixed(count: usize, window: Duration) -> Self {
        if count == 0 {
            Self::drain(window)
        } else {
            Self { mode: CollectMode::Fixed(count), window }
        }
    }

    /// Take whatever arrives until the first quiet window.
    pub fn drain(window: Duration) -> Self {
        Self { mode: CollectMode::Drain, window }
    }
}

impl Default for CollectPolicy {
    /// One line within one second.
    fn default() -> Self {
        Self::fixed(1, Duration::from_millis(1000))
    }
}

/// Gather the reply to `command` according to `policy`.
///
/// A timeout is an expected outcome, never an error: under
/// [`CollectMode::Fixed`] it yields the lines read so far, under
/// [`CollectMode::Drain`] it is the normal end of collection. EOF ends
/// collection immediately and marks the response
/// [`CollectOutcome::Disconnected`], keeping the lines gathered before it.
pub async fn collect_response(
    framer: &mut LineFramer,
    policy: &CollectPolicy,
    command: &str,
) -> Result<Response, TransportError> {
    let start = Instant::now();
    let mut lines = Vec::new();
    let outcome = match policy.mode {
        CollectMode::Fixed(count) => {
            let mut outcome = CollectOutcome::Complete;
            for _ in 0..count {
                match framer.read_line(policy.window).await? {
                    LineEvent::Line(line) => lines.push(line),
                    LineEvent::Timeout | LineEvent::NoData => {
                        outcome = CollectOutcome::TimedOut;
                        break;
                    }
                    LineEvent::Eof => {
                        outcome = CollectOutcome::Disconnected;
                        break;
                    }
                }
            }
            outcome
        }
        CollectMode::Drain => loop {
            match framer.read_line(policy.window).await? {
                LineEvent::Line(line) => lines.push(line),
                LineEvent::Timeout | LineEvent::NoData => break CollectOutcome::TimedOut,
                LineEvent::Eof => break CollectOutcome::Disconnected,
            }
        },
    };
    let response = Response::new(command, lines, outcome, start.elapsed());
    debug!(
        "collected {} line(s) in {:?} ({:?})",
        response.lines.len(),
        response.elapsed,
        response.outcome,
    );
    Ok(response)
}
