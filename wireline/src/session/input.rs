//! Injected input capability for the interactive loop.

use std::io;

use async_trait::async_trait;

/// Source of interactive input lines.
///
/// The session needs exactly two operations: fetch the next line (showing
/// `prompt` however the front end sees fit) and record a line into history.
/// A full line editor qualifies; so does a plain buffered reader over stdin
/// or a scripted queue in tests.
#[async_trait]
pub trait InputSource: Send {
    /// Read one line, without its terminator. `Ok(None)` means end of input.
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Record a line into the front end's history, if it keeps one.
    fn record_history(&mut self, line: &str);
}
