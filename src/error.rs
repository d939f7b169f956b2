//! Error types for parsing and tree operations.
//!
//! `ParseError` is the result code of a failed `parse_line` call. `CliError`
//! covers failures reported by collaborators (position moves, value codec,
//! command and accessor handlers).

use core::fmt;

/// Location of the token that caused a failure, in bytes from line start.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the token
    pub offset: usize,

    /// Token length in bytes
    pub len: usize,
}

impl Span {
    /// Create span from offset and length.
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Byte offset just past the token.
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Line parsing failure.
///
/// Every variant is fatal to the line: the working position is rolled back
/// to what it was before the line was parsed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Internal failure (node lookup failed, output sink failed)
    Failed,

    /// Token matches nothing at the current position
    NoMatches,

    /// Token is a prefix of more than one candidate
    MultipleMatches,

    /// Tree move not possible (above root or beyond maximum depth)
    CannotMove,

    /// Command handler reported failure
    CommandFailed,

    /// Literal could not be converted or stored
    ValueFailed,

    /// Line ended after `=` without a literal
    ExpectingValue,

    /// Character that starts no token
    UnexpectedToken,

    /// Unterminated quoted string
    MalformedToken,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::Failed => "command parsing failed",
            ParseError::NoMatches => "no match",
            ParseError::MultipleMatches => "multiple matches",
            ParseError::CannotMove => "cannot change working position",
            ParseError::CommandFailed => "command failed",
            ParseError::ValueFailed => "invalid value",
            ParseError::ExpectingValue => "expecting value",
            ParseError::UnexpectedToken => "unexpected character",
            ParseError::MalformedToken => "malformed token",
        };
        f.write_str(msg)
    }
}

/// Collaborator error type.
///
/// Returned by position moves, the value codec and `Handlers` callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// Position already at maximum depth
    PathTooDeep,

    /// Position already at root
    AtRoot,

    /// Dynamic node could not be materialized
    NodeUnavailable,

    /// Literal does not parse as the value's type
    InvalidValue {
        /// What was expected (e.g., "unsigned integer")
        expected: &'static str,
    },

    /// Value type has no text conversion
    UnsupportedType,

    /// Typed data does not fit the value's storage
    TypeMismatch,

    /// Buffer capacity exceeded
    BufferFull,

    /// I/O error occurred
    IoError,

    /// Command executed but reported failure
    CommandFailed(heapless::String<128>),

    /// Generic error with message
    Other(heapless::String<128>),
}

impl CliError {
    /// Build `CommandFailed` from a message, truncating to capacity.
    pub fn command_failed(message: &str) -> Self {
        CliError::CommandFailed(truncated(message))
    }

    /// Build `Other` from a message, truncating to capacity.
    pub fn other(message: &str) -> Self {
        CliError::Other(truncated(message))
    }
}

fn truncated(message: &str) -> heapless::String<128> {
    let mut s = heapless::String::new();
    for c in message.chars() {
        if s.push(c).is_err() {
            break;
        }
    }
    s
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::PathTooDeep => write!(f, "Path too deep"),
            CliError::AtRoot => write!(f, "Already at root"),
            CliError::NodeUnavailable => write!(f, "Node unavailable"),
            CliError::InvalidValue { expected } => write!(f, "Expected {}", expected),
            CliError::UnsupportedType => write!(f, "Unsupported value type"),
            CliError::TypeMismatch => write!(f, "Value type mismatch"),
            CliError::BufferFull => write!(f, "Buffer full"),
            CliError::IoError => write!(f, "I/O error"),
            CliError::CommandFailed(msg) => write!(f, "{}", msg),
            CliError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<fmt::Error> for CliError {
    fn from(_: fmt::Error) -> Self {
        CliError::IoError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::format;

    #[test]
    fn test_parse_error_display() {
        assert_eq!(format!("{}", ParseError::NoMatches), "no match");
        assert_eq!(format!("{}", ParseError::MultipleMatches), "multiple matches");
        assert_eq!(
            format!("{}", ParseError::CannotMove),
            "cannot change working position"
        );
        assert_eq!(format!("{}", ParseError::ExpectingValue), "expecting value");
    }

    #[test]
    fn test_cli_error_display() {
        assert_eq!(format!("{}", CliError::PathTooDeep), "Path too deep");
        assert_eq!(
            format!("{}", CliError::InvalidValue { expected: "boolean" }),
            "Expected boolean"
        );
        assert_eq!(
            format!("{}", CliError::command_failed("disk busy")),
            "disk busy"
        );
    }

    #[test]
    fn test_long_message_truncated() {
        let long = "x".repeat(300);
        match CliError::other(&long) {
            CliError::Other(msg) => assert_eq!(msg.len(), 128),
            _ => panic!("Expected Other"),
        }
    }

    #[test]
    fn test_span_end() {
        let span = Span::new(4, 6);
        assert_eq!(span.end(), 10);
        assert_eq!(Span::default(), Span::new(0, 0));
    }
}
