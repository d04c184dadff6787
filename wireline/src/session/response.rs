//! Collected reply to one command.

use std::fmt;
use std::time::Duration;

/// How a collection run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    /// The fixed line count was satisfied.
    Complete,
    /// The wait window elapsed: a drain finished, or a fixed count came up
    /// short.
    TimedOut,
    /// The stream reached EOF while collecting.
    Disconnected,
}

/// Reply to one command.
///
/// Holds only the lines that actually arrived, in arrival order; a response
/// cut short by a timeout is simply shorter than asked for, with
/// [`CollectOutcome::TimedOut`] recording the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The command this is the reply to, before framing.
    pub command: String,
    /// Decoded lines in arrival order.
    pub lines: Vec<String>,
    /// How collection ended.
    pub outcome: CollectOutcome,
    /// Wall time spent collecting.
    pub elapsed: Duration,
}

impl Response {
    /// Create a response from the lines that arrived.
    pub fn new(
        command: impl Into<String>,
        lines: Vec<String>,
        outcome: CollectOutcome,
        elapsed: Duration,
    ) -> Self {
        Self { command: command.into(), lines, outcome, elapsed }
    }

    /// The last line, if any arrived.
    pub fn last_line(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    /// Whether no lines arrived at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the stream reached EOF during collection.
    pub fn is_disconnected(&self) -> bool {
        self.outcome == CollectOutcome::Disconnected
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}
