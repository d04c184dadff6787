//! Outgoing line template.

use std::fmt;

use crate::error::FramerError;

/// Placeholder the command text is substituted for.
const PLACEHOLDER: &str = "{0}";

/// Template applied to every outgoing command.
///
/// A pattern contains `{0}` exactly once; everything around it (typically a
/// trailing `\r`, `\n`, or `\r\n`) is written verbatim. The default template
/// is bare: the command goes out with no terminator at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameTemplate {
    prefix: String,
    suffix: String,
}

impl FrameTemplate {
    /// Parse a pattern such as `"{0}\r\n"`.
    ///
    /// # Errors
    ///
    /// Fails if the placeholder is missing or occurs more than once.
    pub fn parse(pattern: &str) -> Result<Self, FramerError> {
        let Some(at) = pattern.find(PLACEHOLDER) else {
            return Err(FramerError::InvalidTemplate { pattern: pattern.to_string() });
        };
        let suffix = &pattern[at + PLACEHOLDER.len()..];
        if suffix.contains(PLACEHOLDER) {
            return Err(FramerError::InvalidTemplate { pattern: pattern.to_string() });
        }
        Ok(Self {
            prefix: pattern[..at].to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Substitute `command` into the pattern.
    pub fn apply(&self, command: &str) -> String {
        format!("{}{}{}", self.prefix, command, self.suffix)
    }

    /// Reconstruct the pattern text.
    pub fn pattern(&self) -> String {
        format!("{}{PLACEHOLDER}{}", self.prefix, self.suffix)
    }
}

impl fmt::Display for FrameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern())
    }
}
