//! Session directives: input lines handled locally instead of being sent.

use std::time::Duration;

const QUIT: &str = "quit";
const SLEEP: &str = "sleep";
const DATE: &str = "date";

/// A line the session handles itself.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Directive {
    /// Comment line, dropped silently.
    Comment,
    /// Close the session.
    Quit,
    /// Suspend the loop for the given duration.
    Sleep(Duration),
    /// Sleep whose argument did not parse as non-negative seconds.
    InvalidSleep(String),
    /// Print the current timestamp.
    Date,
    /// Escape prefix followed by an unrecognized command (the remainder).
    Unknown(String),
}

impl Directive {
    /// Classify one input line; `None` means the line goes to the device.
    ///
    /// The comment prefix wins over the escape prefix; both match against
    /// the trimmed line. Escape commands are recognized by prefix on the
    /// remainder, so `quit`, `sleep 2`, and `date` tolerate trailing text.
    pub(crate) fn classify(
        line: &str,
        comment_prefix: Option<&str>,
        escape_prefix: Option<&str>,
    ) -> Option<Self> {
        let trimmed = line.trim();
        if let Some(comment) = comment_prefix {
            if trimmed.starts_with(comment) {
                return Some(Self::Comment);
            }
        }
        let rest = trimmed.strip_prefix(escape_prefix?)?;
        if rest.starts_with(QUIT) {
            Some(Self::Quit)
        } else if let Some(arg) = rest.strip_prefix(SLEEP) {
            Some(Self::parse_sleep(arg.trim()))
        } else if rest.starts_with(DATE) {
            Some(Self::Date)
        } else {
            Some(Self::Unknown(rest.to_string()))
        }
    }

    fn parse_sleep(arg: &str) -> Self {
        let duration = arg
            .parse::<f64>()
            .ok()
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
        match duration {
            Some(duration) => Self::Sleep(duration),
            None => Self::InvalidSleep(arg.to_string()),
        }
    }
}
