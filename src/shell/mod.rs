//! Interactive shell over a character device.
//!
//! The `Shell` struct wires a [`CharIo`] to a [`Parser`]: it echoes typed
//! characters into a bounded line buffer, parses the line on Enter and
//! completes the last token on Tab. There is no cursor movement and no
//! history; editing is append and backspace only.
//!
//! Prompt: `cli /system/ethernet0 > ` (prefix and suffix from `CliConfig`).
//!
//! Errors are reported under the failing token, followed by the handler's
//! reason when there is one:
//!
//! ```text
//! cli / > system quux
//! ---------------^^^^
//! error: no match
//! ```

use crate::config::{CliConfig, DefaultConfig, INPUT_CAPACITY};
use crate::error::Span;
use crate::handler::Handlers;
use crate::io::{CharIo, MatchKind, Output};
use crate::parser::{Mode, Parser};
use crate::tree::{Node, NodeName};
use core::fmt;

// Sub-modules
pub mod decoder;

// Re-export key types
pub use decoder::{InputDecoder, InputEvent};

/// Maximum number of candidates kept for a completion listing.
pub const MAX_CANDIDATES: usize = 16;

/// Prompt buffer.
type Prompt = heapless::String<128>;

/// Shell orchestration struct.
///
/// Generic over:
/// - `'t`: Lifetime of the command tree (typically 'static)
/// - `IO`: CharIo implementation
/// - `H`: Handlers implementation
/// - `C`: CliConfig implementation
pub struct Shell<'t, IO, H, C = DefaultConfig>
where
    IO: CharIo,
    H: Handlers,
    C: CliConfig,
{
    /// Parser session (working position, handlers)
    parser: Parser<'t, H, C>,

    /// Line being edited, limited to `C::MAX_INPUT` bytes
    input_buffer: heapless::String<INPUT_CAPACITY>,

    /// Input decoder (escape sequence state machine)
    decoder: InputDecoder,

    /// Input is ignored until `activate()`
    active: bool,

    /// I/O interface
    io: IO,
}

// ============================================================================
// Debug implementation
// ============================================================================

impl<IO, H, C> fmt::Debug for Shell<'_, IO, H, C>
where
    IO: CharIo,
    H: Handlers,
    C: CliConfig,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("active", &self.active)
            .field("input_buffer", &self.input_buffer.as_str())
            .field("depth", &self.parser.position().depth())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Core methods
// ============================================================================

impl<'t, IO, H, C> Shell<'t, IO, H, C>
where
    IO: CharIo,
    H: Handlers,
    C: CliConfig,
{
    /// Create new Shell at the root of `root`.
    ///
    /// Starts inactive. Call `activate()` to show welcome message and prompt.
    pub fn new(root: &'t Node, handlers: H, io: IO) -> Self {
        Self {
            parser: Parser::new(root, handlers),
            input_buffer: heapless::String::new(),
            decoder: InputDecoder::new(),
            active: false,
            io,
        }
    }

    /// Activate the shell (show welcome message and initial prompt).
    pub fn activate(&mut self) -> Result<(), IO::Error> {
        self.active = true;
        self.io.write_str(C::MSG_WELCOME)?;
        self.write_prompt()
    }

    /// Deactivate the shell.
    ///
    /// Clears the input buffer and returns to the root. Input is ignored
    /// until `activate()` is called again.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.input_buffer.clear();
        self.decoder.reset();
        self.parser.position_mut().reset();
    }

    /// Parser session.
    pub fn parser(&self) -> &Parser<'t, H, C> {
        &self.parser
    }

    /// Parser session (mutable).
    pub fn parser_mut(&mut self) -> &mut Parser<'t, H, C> {
        &mut self.parser
    }

    /// I/O interface.
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// I/O interface (mutable), e.g. to flush buffered output.
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Current line contents.
    pub fn input(&self) -> &str {
        self.input_buffer.as_str()
    }

    /// Process a single character of input.
    pub fn process_char(&mut self, c: char) -> Result<(), IO::Error> {
        if !self.active {
            return Ok(());
        }

        match self.decoder.decode_char(c) {
            InputEvent::None => Ok(()),

            InputEvent::Char(ch) => {
                if self.input_buffer.len() + ch.len_utf8() > C::MAX_INPUT
                    || self.input_buffer.push(ch).is_err()
                {
                    // Buffer full - beep and ignore
                    return self.io.put_char('\x07');
                }
                self.io.put_char(ch)
            }

            InputEvent::Backspace => {
                if self.input_buffer.pop().is_some() {
                    self.io.write_str("\x08 \x08")?;
                }
                Ok(())
            }

            InputEvent::DoubleEsc => {
                self.input_buffer.clear();
                self.clear_line_and_redraw()
            }

            InputEvent::Enter => self.handle_enter(),

            InputEvent::Tab => self.handle_tab(),
        }
    }

    /// Poll for incoming characters and process them.
    ///
    /// Convenience for simple polling loops. Interrupt or DMA driven hosts
    /// should read characters themselves and call
    /// [`process_char()`](Self::process_char).
    pub fn poll(&mut self) -> Result<(), IO::Error> {
        if let Some(c) = self.io.get_char()? {
            self.process_char(c)?;
        }
        Ok(())
    }

    /// Prompt for the working position.
    ///
    /// A path that does not fit is cut short.
    fn prompt(&self) -> Prompt {
        let mut prompt = Prompt::new();
        prompt.push_str(C::PROMPT_PREFIX).ok();
        self.parser.write_path(&mut prompt).ok();
        prompt.push_str(C::PROMPT_SUFFIX).ok();
        prompt
    }

    fn write_prompt(&mut self) -> Result<(), IO::Error> {
        let prompt = self.prompt();
        self.io.write_str(prompt.as_str())
    }

    fn clear_line_and_redraw(&mut self) -> Result<(), IO::Error> {
        self.io.write_str("\r\x1b[K")?; // CR + clear to end of line
        self.write_prompt()?;
        self.io.write_str(self.input_buffer.as_str())
    }

    /// Handle Enter key: execute the line.
    fn handle_enter(&mut self) -> Result<(), IO::Error> {
        let input = self.input_buffer.clone();
        self.input_buffer.clear();
        let prompt_len = self.prompt().chars().count();

        self.io.write_str("\r\n")?;

        let mut out = IoOutput::new(&mut self.io);
        let result = self.parser.parse_line(input.as_str(), Mode::EXEC, &mut out);
        out.finish()?;

        if let Err(err) = result {
            let span = self.parser.error_span().unwrap_or_default();
            self.write_caret(prompt_len, input.as_str(), span)?;

            let mut out = IoOutput::new(&mut self.io);
            let _ = match self.parser.error_cause() {
                Some(cause) => {
                    fmt::Write::write_fmt(&mut out, format_args!("error: {} ({})\r\n", err, cause))
                }
                None => fmt::Write::write_fmt(&mut out, format_args!("error: {}\r\n", err)),
            };
            out.finish()?;
        }

        self.write_prompt()
    }

    /// Underline `span` of `line`, which was typed after a prompt of
    /// `prompt_len` characters.
    fn write_caret(&mut self, prompt_len: usize, line: &str, span: Span) -> Result<(), IO::Error> {
        let offset = line.get(..span.offset).map_or(0, |s| s.chars().count());
        let len = line
            .get(span.offset..span.end())
            .map_or(0, |s| s.chars().count())
            .max(1);

        for _ in 0..prompt_len + offset {
            self.io.put_char('-')?;
        }
        for _ in 0..len {
            self.io.put_char('^')?;
        }
        self.io.write_str("\r\n")
    }

    /// Handle Tab key: complete the last token or list candidates.
    fn handle_tab(&mut self) -> Result<(), IO::Error> {
        let mut mode = Mode::ALLOW_BEST_MATCH | Mode::ALLOW_MATCHES;
        if self.input_buffer.is_empty() || self.input_buffer.ends_with([' ', '\t']) {
            mode |= Mode::ALLOW_SUGGESTIONS;
        }

        let input = self.input_buffer.clone();
        let mut completion = Completion::new();
        // Parse errors are expected here (ambiguous prefix); the collected
        // candidates are all that matters.
        let _ = self.parser.parse_line(input.as_str(), mode, &mut completion);

        let Some(span) = completion.span.filter(|span| span.end() == input.len()) else {
            return self.io.put_char('\x07');
        };

        // A lone candidate completes to its full name even when special
        // tokens or a capacity cut left the common prefix short of it.
        let single = match completion.count {
            1 => completion.candidates.first(),
            _ => None,
        };
        let (suffix, unique) = match single {
            Some(name) => (name.get(span.len..).unwrap_or(""), true),
            None => (completion.best.get(span.len..).unwrap_or(""), false),
        };

        if !suffix.is_empty() || unique {
            let fits = self.input_buffer.len() + suffix.len() + usize::from(unique) <= C::MAX_INPUT;
            if !fits || self.input_buffer.push_str(suffix).is_err() {
                return self.io.put_char('\x07');
            }
            self.io.write_str(suffix)?;
            if unique && self.input_buffer.push(' ').is_ok() {
                self.io.put_char(' ')?;
            }
            return Ok(());
        }

        if completion.count > 1 {
            self.io.write_str("\r\n")?;
            for candidate in completion.candidates.iter() {
                self.io.write_str(candidate.as_str())?;
                self.io.write_str("  ")?;
            }
            self.io.write_str("\r\n")?;
            self.write_prompt()?;
            return self.io.write_str(self.input_buffer.as_str());
        }

        self.io.put_char('\x07')
    }
}

// ============================================================================
// Output adapters
// ============================================================================

/// Parser output written straight to the character device.
///
/// The first I/O error is kept and reported by `finish`.
struct IoOutput<'a, IO: CharIo> {
    io: &'a mut IO,
    error: Option<IO::Error>,
}

impl<'a, IO: CharIo> IoOutput<'a, IO> {
    fn new(io: &'a mut IO) -> Self {
        Self { io, error: None }
    }

    fn finish(self) -> Result<(), IO::Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<IO: CharIo> fmt::Write for IoOutput<'_, IO> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.error.is_some() {
            return Err(fmt::Error);
        }
        self.io.write_str(s).map_err(|err| {
            self.error = Some(err);
            fmt::Error
        })
    }
}

impl<IO: CharIo> Output for IoOutput<'_, IO> {}

/// Collects the candidates and best match of the last resolved token.
///
/// Each `on_best_match` closes a batch; the next `on_match` starts a new one.
#[derive(Debug)]
struct Completion {
    candidates: heapless::Vec<NodeName, MAX_CANDIDATES>,
    count: usize,
    best: NodeName,
    span: Option<Span>,
    closed: bool,
}

impl Completion {
    fn new() -> Self {
        Self {
            candidates: heapless::Vec::new(),
            count: 0,
            best: NodeName::new(),
            span: None,
            closed: true,
        }
    }

    fn restart(&mut self) {
        self.candidates.clear();
        self.count = 0;
    }
}

impl fmt::Write for Completion {
    fn write_str(&mut self, _s: &str) -> fmt::Result {
        Ok(())
    }
}

impl Output for Completion {
    fn on_match(&mut self, name: &str, _kind: MatchKind) {
        if self.closed {
            self.restart();
            self.closed = false;
        }
        self.count += 1;
        let mut candidate = NodeName::new();
        if candidate.push_str(name).is_ok() {
            // Listing is cut at capacity, the count is not
            self.candidates.push(candidate).ok();
        }
    }

    fn on_best_match(&mut self, best: &str, span: Span) {
        if self.closed {
            self.restart();
        }
        self.closed = true;
        self.best.clear();
        self.best.push_str(best).ok();
        self.span = Some(span);
    }
}
