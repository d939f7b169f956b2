//! Output sinks and character I/O.
//!
//! The parser never owns a terminal. Everything it produces (help, value
//! readouts, command output, completion candidates) goes through an
//! [`Output`] passed into each `parse_line` call. The optional shell drives a
//! [`CharIo`] device and adapts it to `Output`.

use crate::error::Span;
use core::fmt;

/// Semantic tag of a completion candidate, for optional highlighting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatchKind {
    /// Static or dynamic subnode
    Node,

    /// Configuration value
    Value,

    /// Executable command
    Command,
}

/// Parser output sink.
///
/// `write_str` (from `fmt::Write`) is the print handler. The two callbacks
/// default to no-ops so a plain text sink only has to implement `fmt::Write`.
pub trait Output: fmt::Write {
    /// Called once per candidate name while a token is being resolved.
    ///
    /// Only invoked when the mode allows matches (or during the end-of-line
    /// suggestion pass).
    fn on_match(&mut self, name: &str, kind: MatchKind) {
        let _ = (name, kind);
    }

    /// Called after a token is resolved with the longest common prefix of
    /// all candidates and the span of the token it extends.
    fn on_best_match(&mut self, best: &str, span: Span) {
        let _ = (best, span);
    }
}

/// Output sink that discards everything.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullOutput;

impl fmt::Write for NullOutput {
    fn write_str(&mut self, _s: &str) -> fmt::Result {
        Ok(())
    }
}

impl Output for NullOutput {}

/// Platform-agnostic character I/O trait.
///
/// Implementations must buffer output internally:
/// - Async platforms: Buffer to memory, flush externally after `process_char()`
/// - Bare-metal: May flush immediately (blocking acceptable)
/// - `put_char()` and `write_str()` MUST NOT block indefinitely
pub trait CharIo {
    /// Platform-specific error type
    type Error;

    /// Non-blocking character read.
    ///
    /// Returns:
    /// - `Ok(Some(char))` if character available
    /// - `Ok(None)` if no character available (non-blocking)
    /// - `Err(Self::Error)` on I/O error
    fn get_char(&mut self) -> Result<Option<char>, Self::Error>;

    /// Write character to output buffer.
    fn put_char(&mut self, c: char) -> Result<(), Self::Error>;

    /// Write string to output buffer.
    ///
    /// Default implementation uses `put_char()` repeatedly.
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for c in s.chars() {
            self.put_char(c)?;
        }
        Ok(())
    }
}
