//! Line tokenizer.
//!
//! Splits a command line into tokens. Whitespace (space, tab) separates
//! tokens and is never part of one, except inside a quoted string.
//!
//! Token classes, chosen by the first character:
//! - `(` `)` `=` `/` `?`: single-character symbol
//! - digit or `-`: number, `[0-9.-]+`
//! - letter or `_`: name, `[A-Za-z_][A-Za-z0-9_:-]*`
//! - `.`: run of dots (`..` is "one level up")
//! - `"`: quoted string up to the closing quote, quotes included
//!
//! The cursor always advances past whatever was examined, so a failed call
//! never stalls the caller.

use crate::error::{ParseError, Span};

/// Token class.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// One of `( ) = / ?`
    Symbol,

    /// Numeric literal
    Number,

    /// Identifier (node, value or command name, bare literal)
    Name,

    /// Run of `.`
    Dots,

    /// Double-quoted string, quotes included
    Quoted,
}

/// Token borrowed from the input line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token text
    pub text: &'a str,

    /// Location in the line
    pub span: Span,

    /// Token class
    pub kind: TokenKind,
}

/// Tokenizer failure.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Character that starts no token
    Unexpected(Span),

    /// Quoted string not closed before end of line
    Malformed(Span),
}

impl TokenError {
    /// Location of the offending input.
    pub fn span(&self) -> Span {
        match *self {
            TokenError::Unexpected(span) | TokenError::Malformed(span) => span,
        }
    }
}

impl From<TokenError> for ParseError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Unexpected(_) => ParseError::UnexpectedToken,
            TokenError::Malformed(_) => ParseError::MalformedToken,
        }
    }
}

/// Cursor over one line.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Start at the beginning of `line`.
    pub fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consume the next token.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(token))`: Token found, cursor placed right after it
    /// - `Ok(None)`: Only whitespace left
    /// - `Err(TokenError)`: Unexpected character or unterminated string
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, TokenError> {
        let bytes = self.line.as_bytes();

        while self.pos < bytes.len() && matches!(bytes[self.pos], b' ' | b'\t') {
            self.pos += 1;
        }

        let start = self.pos;
        let Some(first) = self.line[start..].chars().next() else {
            return Ok(None);
        };

        let kind = match first {
            '(' | ')' | '=' | '/' | '?' => {
                self.pos += 1;
                TokenKind::Symbol
            }
            '0'..='9' | '-' => {
                self.skip_while(|b| b.is_ascii_digit() || b == b'.' || b == b'-');
                TokenKind::Number
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                self.pos += 1;
                self.skip_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b':' | b'-'));
                TokenKind::Name
            }
            '.' => {
                self.skip_while(|b| b == b'.');
                TokenKind::Dots
            }
            '"' => {
                match self.line[start + 1..].find('"') {
                    Some(close) => self.pos = start + 1 + close + 1,
                    None => {
                        self.pos = self.line.len();
                        return Err(TokenError::Malformed(Span::new(start, self.pos - start)));
                    }
                }
                TokenKind::Quoted
            }
            other => {
                self.pos += other.len_utf8();
                return Err(TokenError::Unexpected(Span::new(start, self.pos - start)));
            }
        };

        Ok(Some(Token {
            text: &self.line[start..self.pos],
            span: Span::new(start, self.pos - start),
            kind,
        }))
    }

    fn skip_while(&mut self, accept: impl Fn(u8) -> bool) {
        let bytes = self.line.as_bytes();
        while self.pos < bytes.len() && accept(bytes[self.pos]) {
            self.pos += 1;
        }
    }
}
