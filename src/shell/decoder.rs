//! Input decoder for terminal character sequences.
//!
//! Converts raw terminal characters into logical line-editing events. The
//! shell has no cursor movement and no history, so ANSI escape sequences
//! (arrow keys, function keys) are consumed and dropped. Two ESC presses in a
//! row clear the line.
//!
//! This is a pure decoder: it doesn't manage buffers or perform I/O.

/// Decoder state for escape sequence handling.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputState {
    /// Normal input mode
    Normal,

    /// Saw `\r`; a directly following `\n` belongs to the same Enter
    CarriageReturn,

    /// Saw first ESC character
    EscapeStart,

    /// Saw ESC [ (inside a control sequence)
    EscapeSequence,
}

/// Logical input event from terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// No event (accumulating or discarded sequence)
    None,

    /// Regular character typed
    Char(char),

    /// Backspace key (ASCII BS or DEL)
    Backspace,

    /// Enter key (`\r`, `\n` or `\r\n`)
    Enter,

    /// Tab key (completion request)
    Tab,

    /// Double ESC pressed (clear line)
    DoubleEsc,
}

/// Terminal input decoder.
#[derive(Debug)]
pub struct InputDecoder {
    state: InputState,
}

impl InputDecoder {
    /// Create new decoder in Normal state.
    pub fn new() -> Self {
        Self {
            state: InputState::Normal,
        }
    }

    /// Decode single character into input event.
    ///
    /// ```rust,ignore
    /// assert_eq!(decoder.decode_char('h'), InputEvent::Char('h'));
    ///
    /// // Up arrow (ESC [ A) is swallowed
    /// decoder.decode_char('\x1b');
    /// decoder.decode_char('[');
    /// assert_eq!(decoder.decode_char('A'), InputEvent::None);
    /// ```
    pub fn decode_char(&mut self, c: char) -> InputEvent {
        match self.state {
            InputState::Normal => self.decode_normal(c),
            InputState::CarriageReturn => {
                self.state = InputState::Normal;
                if c == '\n' {
                    InputEvent::None
                } else {
                    self.decode_normal(c)
                }
            }
            InputState::EscapeStart => self.decode_escape_start(c),
            InputState::EscapeSequence => self.decode_escape_sequence(c),
        }
    }

    fn decode_normal(&mut self, c: char) -> InputEvent {
        match c {
            '\x1b' => {
                self.state = InputState::EscapeStart;
                InputEvent::None
            }
            '\r' => {
                self.state = InputState::CarriageReturn;
                InputEvent::Enter
            }
            '\n' => InputEvent::Enter,
            '\t' => InputEvent::Tab,
            '\x08' | '\x7f' => InputEvent::Backspace,
            c if c.is_control() => InputEvent::None,
            _ => InputEvent::Char(c),
        }
    }

    fn decode_escape_start(&mut self, c: char) -> InputEvent {
        match c {
            '\x1b' => {
                self.state = InputState::Normal;
                InputEvent::DoubleEsc
            }
            '[' => {
                self.state = InputState::EscapeSequence;
                InputEvent::None
            }
            // ESC followed by a non-sequence character
            _ => {
                self.state = InputState::Normal;
                self.decode_normal(c)
            }
        }
    }

    fn decode_escape_sequence(&mut self, c: char) -> InputEvent {
        // Parameter and intermediate bytes (e.g. "1;5" in ESC [ 1 ; 5 A)
        // keep the sequence open; any final byte ends it.
        if !matches!(c, '\x20'..='\x3f') {
            self.state = InputState::Normal;
        }
        InputEvent::None
    }

    /// Reset decoder state to Normal.
    pub fn reset(&mut self) {
        self.state = InputState::Normal;
    }

    /// Get current decoder state (for testing/debugging).
    #[cfg(test)]
    pub fn state(&self) -> InputState {
        self.state
    }
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self::new()
    }
}
