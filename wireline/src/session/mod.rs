//! Interactive command/response session.
//!
//! A [`Session`] owns one transport for its whole life and exchanges lines
//! with the device behind it. The interactive loop drains unsolicited device
//! output before each prompt, handles comment and escape directives locally,
//! sends everything else as a command, and prints the collected reply. It
//! terminates on end of input, the `quit` escape, stream EOF, or a reply
//! ending with the configured goodbye word; the transport is closed on every
//! exit path.

mod collector;
mod directive;
mod input;
mod response;

use std::io::Write;
use std::time::Duration;

use chrono::Local;
use log::{debug, error, info, warn};

use crate::error::{Error, Result, SessionError, TransportError};
use crate::framer::{FrameTemplate, LineEvent, LineFramer};
use crate::transport::Transport;

use directive::Directive;

pub use collector::{collect_response, CollectMode, CollectPolicy};
pub use input::InputSource;
pub use response::{CollectOutcome, Response};

/// Default interactive prompt.
pub const DEFAULT_PROMPT: &str = "wireline> ";

/// Read window for listen-only mode; re-arms silently until EOF.
const LISTEN_WINDOW: Duration = Duration::from_secs(1);

/// Session configuration: framing, collection, and directive settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Template for outgoing lines.
    pub template: FrameTemplate,
    /// Uppercase outgoing command text before framing.
    pub uppercase: bool,
    /// How replies are collected.
    pub policy: CollectPolicy,
    /// Prompt handed to the input front end.
    pub prompt: String,
    /// Terminate after a reply whose last line equals this word.
    pub goodbye_word: Option<String>,
    /// Input lines starting with this prefix (after trimming) are dropped.
    pub comment_prefix: Option<String>,
    /// Prefix introducing the quit/sleep/date escape commands.
    pub escape_prefix: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            template: FrameTemplate::default(),
            uppercase: false,
            policy: CollectPolicy::default(),
            prompt: DEFAULT_PROMPT.to_string(),
            goodbye_word: None,
            comment_prefix: None,
            escape_prefix: None,
        }
    }
}

/// Builder for [`Session`].
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use wireline::{CollectPolicy, FrameTemplate, Session, TcpTransport};
///
/// # async fn example() -> Result<(), wireline::Error> {
/// let transport = TcpTransport::connect("10.0.0.5", 23, Duration::from_secs(2)).await?;
/// let mut session = Session::builder()
///     .template(FrameTemplate::parse("{0}\r\n")?)
///     .policy(CollectPolicy::fixed(1, Duration::from_millis(1000)))
///     .goodbye_word("BYE")
///     .build(Box::new(transport));
///
/// let response = session.send_once("*IDN?").await?;
/// println!("{response}");
/// session.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    config: SessionConfig,
}

impl SessionBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Template for outgoing lines.
    pub fn template(mut self, template: FrameTemplate) -> Self {
        self.config.template = template;
        self
    }

    /// Uppercase outgoing command text before framing.
    pub fn uppercase(mut self, uppercase: bool) -> Self {
        self.config.uppercase = uppercase;
        self
    }

    /// Reply collection policy.
    pub fn policy(mut self, policy: CollectPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Interactive prompt.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = prompt.into();
        self
    }

    /// Terminate after a reply whose last line equals `word`.
    pub fn goodbye_word(mut self, word: impl Into<String>) -> Self {
        self.config.goodbye_word = Some(word.into());
        self
    }

    /// Drop input lines starting with `prefix`.
    pub fn comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.comment_prefix = Some(prefix.into());
        self
    }

    /// Recognize escape commands behind `prefix`.
    pub fn escape_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.escape_prefix = Some(prefix.into());
        self
    }

    /// Build the session over an open transport.
    pub fn build(self, transport: Box<dyn Transport>) -> Session {
        Session::new(transport, self.config)
    }
}

/// One interactive session over one transport.
///
/// After [`close`](Self::close) every operation fails fast with
/// [`SessionError::Closed`]; closing again is a no-op.
pub struct Session {
    framer: Option<LineFramer>,
    config: SessionConfig,
}

impl Session {
    /// Create a session over an open transport.
    pub fn new(transport: Box<dyn Transport>, config: SessionConfig) -> Self {
        let framer = LineFramer::new(transport, config.template.clone(), config.uppercase);
        Self { framer: Some(framer), config }
    }

    /// Start a [`SessionBuilder`].
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// The session's configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether the session is still open.
    pub fn is_open(&self) -> bool {
        self.framer.is_some()
    }

    /// Send one command and collect its reply under the configured policy.
    pub async fn send_once(&mut self, command: &str) -> Result<Response> {
        let framer = self.framer.as_mut().ok_or(SessionError::Closed)?;
        let response = exchange(framer, &self.config.policy, command).await?;
        Ok(response)
    }

    /// Run the interactive loop until it terminates.
    ///
    /// Terminates on end of input, the `quit` escape, stream EOF, or the
    /// goodbye word. I/O failures on individual exchanges are reported and
    /// the loop keeps going. The transport is closed on every exit path.
    pub async fn run_interactive(
        &mut self,
        input: &mut dyn InputSource,
        out: &mut (dyn Write + Send),
    ) -> Result<()> {
        if self.framer.is_none() {
            return Err(SessionError::Closed.into());
        }
        let outcome = self.interactive_loop(input, out).await;
        self.close().await;
        outcome
    }

    /// Listen-only mode: print every incoming line until EOF.
    ///
    /// Never transmits. The transport is closed on every exit path.
    pub async fn run_listen(&mut self, out: &mut (dyn Write + Send)) -> Result<()> {
        if self.framer.is_none() {
            return Err(SessionError::Closed.into());
        }
        let outcome = self.listen_loop(out).await;
        self.close().await;
        outcome
    }

    /// Close the session and its transport. Idempotent.
    pub async fn close(&mut self) {
        if let Some(mut framer) = self.framer.take() {
            framer.close().await;
            debug!("session closed");
        }
    }

    async fn interactive_loop(
        &mut self,
        input: &mut dyn InputSource,
        out: &mut (dyn Write + Send),
    ) -> Result<()> {
        loop {
            let framer = self.framer.as_mut().ok_or(SessionError::Closed)?;
            if drain_pending(framer, out).await? {
                info!("stream closed by peer");
                return Ok(());
            }

            let line = match input.read_line(&self.config.prompt).await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    write_line(out, "")?;
                    return Ok(());
                }
                Err(err) => {
                    error!("input failed: {err}");
                    write_line(out, "")?;
                    return Ok(());
                }
            };
            if !line.is_empty() {
                input.record_history(&line);
            }

            let comment = self.config.comment_prefix.as_deref();
            let escape = self.config.escape_prefix.as_deref();
            match Directive::classify(&line, comment, escape) {
                Some(Directive::Comment) => continue,
                Some(Directive::Quit) => {
                    write_line(out, "")?;
                    return Ok(());
                }
                Some(Directive::Sleep(duration)) => {
                    debug!("sleeping {duration:?}");
                    tokio::time::sleep(duration).await;
                    continue;
                }
                Some(Directive::InvalidSleep(arg)) => {
                    warn!("cannot parse sleep seconds {arg:?}");
                    continue;
                }
                Some(Directive::Date) => {
                    write_line(out, &format!("*** Date: {}", Local::now().to_rfc2822()))?;
                    continue;
                }
                Some(Directive::Unknown(rest)) => {
                    warn!("unknown escape: {}{rest}", escape.unwrap_or_default());
                    continue;
                }
                None => {}
            }

            let framer = self.framer.as_mut().ok_or(SessionError::Closed)?;
            if line.is_empty() {
                // an empty line flushes pending device output instead of
                // sending an empty command, but only if output is pending
                match framer.has_buffered_line().await {
                    Ok(true) => {
                        if drain_pending(framer, out).await? {
                            info!("stream closed by peer");
                            return Ok(());
                        }
                        continue;
                    }
                    Ok(false) => {}
                    Err(err) => {
                        error!("read failed: {err}");
                        continue;
                    }
                }
            }

            match exchange(framer, &self.config.policy, &line).await {
                Ok(response) => {
                    for reply in &response.lines {
                        write_line(out, reply)?;
                    }
                    if response.is_disconnected() {
                        info!("stream closed by peer");
                        return Ok(());
                    }
                    if let Some(word) = &self.config.goodbye_word {
                        if response.last_line() == Some(word.as_str()) {
                            debug!("goodbye word {word:?} received");
                            return Ok(());
                        }
                    }
                }
                Err(TransportError::Closed) => {
                    error!("transport closed during exchange");
                    return Ok(());
                }
                Err(err) => error!("exchange failed: {err}"),
            }
        }
    }

    async fn listen_loop(&mut self, out: &mut (dyn Write + Send)) -> Result<()> {
        let framer = self.framer.as_mut().ok_or(SessionError::Closed)?;
        loop {
            match framer.read_line(LISTEN_WINDOW).await {
                Ok(LineEvent::Line(line)) => write_line(out, &line)?,
                Ok(LineEvent::Timeout) | Ok(LineEvent::NoData) => continue,
                Ok(LineEvent::Eof) => {
                    info!("stream closed by peer");
                    return Ok(());
                }
                Err(TransportError::Closed) => return Ok(()),
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.framer.is_some() {
            debug!("session dropped while open; transport closes with it");
        }
    }
}

/// Print any complete lines the device has already pushed.
///
/// Returns `true` when the stream reached EOF.
async fn drain_pending(framer: &mut LineFramer, out: &mut (dyn Write + Send)) -> Result<bool> {
    loop {
        match framer.try_read_line().await {
            Ok(LineEvent::Line(line)) => write_line(out, &line)?,
            Ok(LineEvent::NoData) | Ok(LineEvent::Timeout) => return Ok(false),
            Ok(LineEvent::Eof) => return Ok(true),
            Err(TransportError::Closed) => return Ok(true),
            Err(err) => {
                warn!("read failed while draining: {err}");
                return Ok(false);
            }
        }
    }
}

/// One request/response exchange.
async fn exchange(
    framer: &mut LineFramer,
    policy: &CollectPolicy,
    command: &str,
) -> std::result::Result<Response, TransportError> {
    framer.send(command).await?;
    collect_response(framer, policy, command).await
}

fn write_line(out: &mut (dyn Write + Send), line: &str) -> Result<()> {
    writeln!(out, "{line}").map_err(|err| Error::Session(SessionError::Output(err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use crate::transport::ReadEvent;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::atomic::Ordering;
    use std::time::Instant;

    const WINDOW: Duration = Duration::from_millis(50);

    struct ScriptInput {
        lines: VecDeque<String>,
        history: Vec<String>,
        prompts: Vec<String>,
    }

    impl ScriptInput {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                history: Vec::new(),
                prompts: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl InputSource for ScriptInput {
        async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
            self.prompts.push(prompt.to_string());
            Ok(self.lines.pop_front())
        }

        fn record_history(&mut self, line: &str) {
            self.history.push(line.to_string());
        }
    }

    struct FailingInput;

    #[async_trait]
    impl InputSource for FailingInput {
        async fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            Err(io::Error::other("terminal went away"))
        }

        fn record_history(&mut self, _line: &str) {}
    }

    fn config() -> SessionConfig {
        SessionConfig {
            template: FrameTemplate::parse("{0}\n").unwrap(),
            policy: CollectPolicy::fixed(1, WINDOW),
            ..SessionConfig::default()
        }
    }

    fn output_of(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_goodbye_word_terminates() {
        let transport =
            MockTransport::new(vec![ReadEvent::Timeout, MockTransport::data("Bye!\n")]);
        let (written, closes) = transport.handles();
        let mut session = Session::new(
            Box::new(transport),
            SessionConfig { goodbye_word: Some("Bye!".into()), ..config() },
        );
        let mut input = ScriptInput::new(&["hello", "never read"]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        assert_eq!(*written.lock().unwrap(), b"hello\n");
        assert_eq!(output_of(out), "Bye!\n");
        assert_eq!(input.lines.len(), 1);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(!session.is_open());
    }

    #[tokio::test]
    async fn test_goodbye_requires_exact_match() {
        let transport =
            MockTransport::new(vec![ReadEvent::Timeout, MockTransport::data("Bye!!\n")]);
        let mut session = Session::new(
            Box::new(transport),
            SessionConfig { goodbye_word: Some("Bye!".into()), ..config() },
        );
        let mut input = ScriptInput::new(&["hello"]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        // terminated by end of input (blank line), not by the sentinel
        assert_eq!(output_of(out), "Bye!!\n\n");
        assert!(input.lines.is_empty());
    }

    #[tokio::test]
    async fn test_comment_lines_are_dropped() {
        let transport = MockTransport::silent();
        let (written, _) = transport.handles();
        let mut session = Session::new(
            Box::new(transport),
            SessionConfig { comment_prefix: Some("#".into()), ..config() },
        );
        let mut input = ScriptInput::new(&["# not for the device"]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        assert!(written.lock().unwrap().is_empty());
        assert_eq!(output_of(out), "\n");
    }

    #[tokio::test]
    async fn test_quit_escape_terminates() {
        let transport = MockTransport::silent();
        let (written, closes) = transport.handles();
        let mut session = Session::new(
            Box::new(transport),
            SessionConfig { escape_prefix: Some("!".into()), ..config() },
        );
        let mut input = ScriptInput::new(&["!quit", "never read"]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        assert!(written.lock().unwrap().is_empty());
        assert_eq!(output_of(out), "\n");
        assert_eq!(input.lines.len(), 1);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sleep_escape_pauses() {
        let transport = MockTransport::silent();
        let (written, _) = transport.handles();
        let mut session = Session::new(
            Box::new(transport),
            SessionConfig { escape_prefix: Some("!".into()), ..config() },
        );
        let mut input = ScriptInput::new(&["!sleep 0.01"]);
        let mut out = Vec::new();

        let start = Instant::now();
        session.run_interactive(&mut input, &mut out).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(10));
        assert!(written.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_date_escape_prints_timestamp() {
        let transport = MockTransport::silent();
        let (written, _) = transport.handles();
        let mut session = Session::new(
            Box::new(transport),
            SessionConfig { escape_prefix: Some("!".into()), ..config() },
        );
        let mut input = ScriptInput::new(&["!date"]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        assert!(written.lock().unwrap().is_empty());
        assert!(output_of(out).contains("*** Date: "));
    }

    #[tokio::test]
    async fn test_unknown_escape_sends_nothing() {
        let transport = MockTransport::silent();
        let (written, _) = transport.handles();
        let mut session = Session::new(
            Box::new(transport),
            SessionConfig { escape_prefix: Some("!".into()), ..config() },
        );
        let mut input = ScriptInput::new(&["!frobnicate"]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        assert!(written.lock().unwrap().is_empty());
        assert_eq!(output_of(out), "\n");
    }

    #[tokio::test]
    async fn test_end_of_input_prints_blank_line() {
        let transport = MockTransport::silent();
        let (_, closes) = transport.handles();
        let mut session = Session::new(Box::new(transport), config());
        let mut input = ScriptInput::new(&[]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        assert_eq!(output_of(out), "\n");
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_input_failure_ends_session() {
        let transport = MockTransport::silent();
        let (written, closes) = transport.handles();
        let mut session = Session::new(Box::new(transport), config());
        let mut input = FailingInput;
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        // reported like end of input: blank line, then a clean shutdown
        assert_eq!(output_of(out), "\n");
        assert!(written.lock().unwrap().is_empty());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(!session.is_open());
    }

    #[tokio::test]
    async fn test_eof_during_collect_terminates() {
        let transport = MockTransport::new(vec![
            ReadEvent::Timeout,
            MockTransport::data("one\n"),
            ReadEvent::Eof,
        ]);
        let (_, closes) = transport.handles();
        let mut session = Session::new(
            Box::new(transport),
            SessionConfig { policy: CollectPolicy::fixed(5, WINDOW), ..config() },
        );
        let mut input = ScriptInput::new(&["cmd", "never read"]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        assert_eq!(output_of(out), "one\n");
        assert_eq!(input.lines.len(), 1);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_eof_before_prompt_terminates() {
        let transport = MockTransport::new(vec![MockTransport::data("late\n"), ReadEvent::Eof]);
        let (written, closes) = transport.handles();
        let mut session = Session::new(Box::new(transport), config());
        let mut input = ScriptInput::new(&["never read"]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        // the pushed line still prints; no prompt is ever issued
        assert_eq!(output_of(out), "late\n");
        assert!(input.prompts.is_empty());
        assert_eq!(input.lines.len(), 1);
        assert!(written.lock().unwrap().is_empty());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(!session.is_open());
    }

    #[tokio::test]
    async fn test_eof_while_draining_on_empty_line() {
        let transport = MockTransport::new(vec![
            ReadEvent::Timeout,
            MockTransport::data("tail\n"),
            ReadEvent::Eof,
        ]);
        let (written, closes) = transport.handles();
        let mut session = Session::new(Box::new(transport), config());
        let mut input = ScriptInput::new(&["", "never read"]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        // terminated by the EOF seen while draining, not by end of input
        assert_eq!(output_of(out), "tail\n");
        assert_eq!(input.lines.len(), 1);
        assert!(written.lock().unwrap().is_empty());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_line_drains_pending_output() {
        let transport =
            MockTransport::new(vec![ReadEvent::Timeout, MockTransport::data("pushed\n")]);
        let (written, _) = transport.handles();
        let mut session = Session::new(Box::new(transport), config());
        let mut input = ScriptInput::new(&[""]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        assert!(written.lock().unwrap().is_empty());
        assert_eq!(output_of(out), "pushed\n\n");
    }

    #[tokio::test]
    async fn test_empty_line_sends_when_nothing_pending() {
        let transport = MockTransport::silent();
        let (written, _) = transport.handles();
        let mut session = Session::new(Box::new(transport), config());
        let mut input = ScriptInput::new(&[""]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        // the empty command still goes out framed
        assert_eq!(*written.lock().unwrap(), b"\n");
    }

    #[tokio::test]
    async fn test_unsolicited_output_prints_before_prompt() {
        let transport = MockTransport::new(vec![MockTransport::data("alarm\n")]);
        let (written, _) = transport.handles();
        let mut session = Session::new(Box::new(transport), config());
        let mut input = ScriptInput::new(&["status"]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        assert!(output_of(out).starts_with("alarm\n"));
        assert_eq!(*written.lock().unwrap(), b"status\n");
    }

    #[tokio::test]
    async fn test_write_failure_recovers() {
        let transport =
            MockTransport::new(vec![ReadEvent::Timeout, ReadEvent::Timeout]).fail_next_write();
        let (written, closes) = transport.handles();
        let mut session = Session::new(Box::new(transport), config());
        let mut input = ScriptInput::new(&["first", "second"]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        // the first send failed; the loop survived and sent the second
        assert_eq!(*written.lock().unwrap(), b"second\n");
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_history_records_nonempty_lines() {
        let transport = MockTransport::silent();
        let mut session = Session::new(
            Box::new(transport),
            SessionConfig { escape_prefix: Some("!".into()), ..config() },
        );
        let mut input = ScriptInput::new(&["!date", "", "plain"]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        // directives are recorded too; the empty line is not
        assert_eq!(input.history, vec!["!date", "plain"]);
    }

    #[tokio::test]
    async fn test_prompt_is_forwarded() {
        let transport = MockTransport::silent();
        let mut session = Session::new(
            Box::new(transport),
            SessionConfig { prompt: "dev> ".into(), ..config() },
        );
        let mut input = ScriptInput::new(&[]);
        let mut out = Vec::new();

        session.run_interactive(&mut input, &mut out).await.unwrap();

        assert_eq!(input.prompts, vec!["dev> "]);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let transport = MockTransport::silent();
        let (_, closes) = transport.handles();
        let mut session = Session::new(Box::new(transport), config());

        session.close().await;
        session.close().await;

        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(!session.is_open());
    }

    #[tokio::test]
    async fn test_closed_session_fails_fast() {
        let mut session = Session::new(Box::new(MockTransport::silent()), config());
        session.close().await;

        let err = session.send_once("cmd").await.unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::Closed)));

        let mut input = ScriptInput::new(&[]);
        let mut out = Vec::new();
        let err = session.run_interactive(&mut input, &mut out).await.unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::Closed)));
    }

    #[tokio::test]
    async fn test_send_once() {
        let transport = MockTransport::new(vec![MockTransport::data("pong\n")]);
        let (written, _) = transport.handles();
        let mut session = Session::new(Box::new(transport), config());

        let response = session.send_once("ping").await.unwrap();

        assert_eq!(*written.lock().unwrap(), b"ping\n");
        assert_eq!(response.lines, vec!["pong"]);
        assert_eq!(response.outcome, CollectOutcome::Complete);
        assert_eq!(response.command, "ping");
    }

    #[tokio::test]
    async fn test_run_listen_prints_until_eof() {
        let transport = MockTransport::new(vec![
            MockTransport::data("a\nb"),
            MockTransport::data("\n"),
            ReadEvent::Eof,
        ]);
        let (written, closes) = transport.handles();
        let mut session = Session::new(Box::new(transport), config());
        let mut out = Vec::new();

        session.run_listen(&mut out).await.unwrap();

        assert_eq!(output_of(out), "a\nb\n");
        assert!(written.lock().unwrap().is_empty());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_builder_sets_config() {
        let session = Session::builder()
            .template(FrameTemplate::parse("{0}\r").unwrap())
            .uppercase(true)
            .policy(CollectPolicy::drain(WINDOW))
            .prompt("dev> ")
            .goodbye_word("BYE")
            .comment_prefix("#")
            .escape_prefix("!")
            .build(Box::new(MockTransport::silent()));

        assert!(session.is_open());
        assert!(session.config().uppercase);
        assert_eq!(session.config().prompt, "dev> ");
        assert_eq!(session.config().policy, CollectPolicy::drain(WINDOW));
        assert_eq!(session.config().goodbye_word.as_deref(), Some("BYE"));
        assert_eq!(session.config().comment_prefix.as_deref(), Some("#"));
        assert_eq!(session.config().escape_prefix.as_deref(), Some("!"));
    }
}
