//! Line parser.
//!
//! Walks one command line token by token from the working position:
//!
//! ```text
//! system bootloader console-speed = 115200
//! ^node  ^node      ^value        ^op ^literal
//! ```
//!
//! Context transitions: `Node → ValueOperator` on a value name,
//! `ValueOperator → ValueLiteral` on `=`, `ValueLiteral → Node` on the
//! literal. A value name that is not followed by `=` is read instead.
//!
//! Lines are atomic with respect to the working position. Moves made by a
//! line are kept only if the line succeeds in `EXEC` mode and its last token
//! was a move (`..`, `/`, subnode). Any error restores the position the line
//! started from.

use crate::config::{CliConfig, DefaultConfig};
use crate::error::{CliError, ParseError, Span};
use crate::handler::Handlers;
use crate::io::Output;
use crate::tree::position::{Level, Position};
use crate::tree::{Node, NodeView, Value};
use crate::value;
use core::fmt::Write;
use core::marker::PhantomData;
use core::ops::{BitOr, BitOrAssign};

// Sub-modules
pub mod matches;
pub mod token;

use matches::{Context, Match, Matches};
use token::Tokenizer;

/// Side effects allowed while parsing a line.
///
/// Flags combine with `|`. The empty mode parses and resolves only, which
/// validates a line without touching anything.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Mode(u8);

impl Mode {
    /// Nothing but parsing
    pub const NONE: Mode = Mode(0);

    /// Commit moves, run commands, read and write values, print help
    pub const EXEC: Mode = Mode(1 << 0);

    /// Report each candidate through `Output::on_match`
    pub const ALLOW_MATCHES: Mode = Mode(1 << 1);

    /// Resolve an empty token at end of line to list what may follow
    pub const ALLOW_SUGGESTIONS: Mode = Mode(1 << 2);

    /// Report the best match through `Output::on_best_match`
    pub const ALLOW_BEST_MATCH: Mode = Mode(1 << 3);

    /// True if every flag of `other` is set.
    pub const fn contains(self, other: Mode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mode {
    fn bitor_assign(&mut self, rhs: Mode) {
        self.0 |= rhs.0;
    }
}

/// Parser session.
///
/// Owns the working position and the handlers. The tree is borrowed and
/// never modified.
///
/// Generic over `C: CliConfig` for depth and enumeration bounds.
pub struct Parser<'t, H: Handlers, C: CliConfig = DefaultConfig> {
    root: &'t Node,
    position: Position<'t>,
    handlers: H,
    error: Option<Span>,
    cause: Option<CliError>,
    _config: PhantomData<C>,
}

impl<'t, H: Handlers, C: CliConfig> Parser<'t, H, C> {
    /// Create parser at the root of `root`.
    pub fn new(root: &'t Node, handlers: H) -> Self {
        Self {
            root,
            position: Position::new(C::MAX_DEPTH),
            handlers,
            error: None,
            cause: None,
            _config: PhantomData,
        }
    }

    /// Tree root.
    pub fn root(&self) -> &'t Node {
        self.root
    }

    /// Working position.
    pub fn position(&self) -> &Position<'t> {
        &self.position
    }

    /// Working position, for hosts that navigate programmatically.
    pub fn position_mut(&mut self) -> &mut Position<'t> {
        &mut self.position
    }

    /// Session handlers.
    pub fn handlers(&self) -> &H {
        &self.handlers
    }

    /// Session handlers (mutable).
    pub fn handlers_mut(&mut self) -> &mut H {
        &mut self.handlers
    }

    /// Location of the token that made the last `parse_line` call fail.
    ///
    /// `None` after a successful line.
    pub fn error_span(&self) -> Option<Span> {
        self.error
    }

    /// Collaborator error behind the last failed `parse_line` call.
    ///
    /// Set when a handler, the value codec or a dynamic node lookup caused
    /// the failure, e.g. the `CliError::CommandFailed` message of a command.
    /// `None` after a successful line and for pure syntax errors.
    pub fn error_cause(&self) -> Option<&CliError> {
        self.cause.as_ref()
    }

    /// Working node.
    pub fn current_node(&self) -> Result<NodeView<'t>, CliError> {
        self.position.current_node(self.root, &self.handlers)
    }

    /// Write the working path, e.g. `/system/ethernet0`.
    pub fn write_path(&self, out: &mut dyn core::fmt::Write) -> Result<(), CliError> {
        self.position.write_path(&self.handlers, out)
    }

    /// Resolve `token` at the working node without side effects.
    pub fn matches(&self, token: &str) -> Result<Matches, ParseError> {
        let node = self.current_node().map_err(|_| ParseError::Failed)?;
        Ok(matches::resolve(
            &node,
            Context::Node,
            token,
            &self.handlers,
            C::MAX_DNODE_COUNT,
            &mut |_, _| {},
        ))
    }

    /// Parse one line.
    ///
    /// Output (help, value readouts, command output, candidates) goes to
    /// `out`. On error the working position is restored and
    /// [`error_span`](Self::error_span) locates the offending token.
    pub fn parse_line<O: Output>(
        &mut self,
        line: &str,
        mode: Mode,
        out: &mut O,
    ) -> Result<(), ParseError> {
        let snapshot = self.position.clone();
        self.error = None;
        self.cause = None;

        match self.walk(line, mode, out) {
            Ok(true) if mode.contains(Mode::EXEC) => {
                crate::debug!(depth = self.position.depth(), "working position changed");
                Ok(())
            }
            Ok(_) => {
                self.position = snapshot;
                Ok(())
            }
            Err(err) => {
                crate::debug!(error = %err, "line failed, position rolled back");
                self.position = snapshot;
                Err(err)
            }
        }
    }

    /// Walk all tokens of `line`. Returns whether the last token was a move.
    fn walk<O: Output>(&mut self, line: &str, mode: Mode, out: &mut O) -> Result<bool, ParseError> {
        let exec = mode.contains(Mode::EXEC);
        let mut tokens = Tokenizer::new(line);
        let mut context = Context::Node;
        let mut pending: Option<&'static Value> = None;
        let mut moved = false;

        loop {
            let token = match tokens.next_token() {
                Ok(Some(token)) => token,
                Ok(None) => break,
                Err(err) => return Err(self.fail(err.span(), err.into())),
            };
            moved = false;

            let matches = self.resolve(context, token.text, mode, out, token.span)?;
            let found = match (matches.count(), matches.unique()) {
                (0, _) => return Err(self.fail(token.span, ParseError::NoMatches)),
                (1, Some(found)) => found,
                _ => return Err(self.fail(token.span, ParseError::MultipleMatches)),
            };

            // A value not followed by `=` is read
            if context == Context::ValueOperator && !matches!(found, Match::Operator) {
                if let Some(value) = pending.take()
                    && exec
                {
                    self.print_value(value, out, token.span)?;
                }
                context = Context::Node;
            }

            match found {
                Match::Up => {
                    self.position
                        .pop()
                        .map_err(|_| self.fail(token.span, ParseError::CannotMove))?;
                    moved = true;
                }
                Match::Root => {
                    self.position.reset();
                    moved = true;
                }
                Match::Subnode(node) => {
                    self.position
                        .push(Level::Static(node))
                        .map_err(|_| self.fail(token.span, ParseError::CannotMove))?;
                    moved = true;
                }
                Match::DynamicSubnode { dnode, index } => {
                    self.position
                        .push(Level::Dynamic { dnode, index })
                        .map_err(|_| self.fail(token.span, ParseError::CannotMove))?;
                    moved = true;
                }
                Match::Help => {
                    if exec {
                        self.print_help(out)
                            .map_err(|err| self.fail_with(token.span, ParseError::Failed, err))?;
                    }
                }
                Match::Command(command) => {
                    if exec {
                        crate::debug!(id = command.id, "executing command");
                        self.handlers
                            .execute(command, &self.position, out)
                            .map_err(|err| {
                                self.fail_with(token.span, ParseError::CommandFailed, err)
                            })?;
                    }
                }
                Match::Value(value) => {
                    pending = Some(value);
                    context = Context::ValueOperator;
                }
                Match::Operator => {
                    context = Context::ValueLiteral;
                }
                Match::Literal => {
                    context = Context::Node;
                    let value = pending
                        .take()
                        .ok_or_else(|| self.fail(token.span, ParseError::Failed))?;
                    self.write_value(value, token.text, exec)
                        .map_err(|err| self.fail_with(token.span, ParseError::ValueFailed, err))?;
                }
            }
        }

        let end = Span::new(line.len(), 0);

        if mode.contains(Mode::ALLOW_SUGGESTIONS) {
            self.resolve(context, "", mode | Mode::ALLOW_MATCHES, out, end)?;
        }

        match context {
            Context::ValueOperator => {
                if let Some(value) = pending
                    && exec
                {
                    self.print_value(value, out, end)?;
                }
            }
            Context::ValueLiteral if exec => {
                return Err(self.fail(end, ParseError::ExpectingValue));
            }
            _ => {}
        }

        Ok(moved)
    }

    fn resolve<O: Output>(
        &mut self,
        context: Context,
        token: &str,
        mode: Mode,
        out: &mut O,
        span: Span,
    ) -> Result<Matches, ParseError> {
        let node = self
            .current_node()
            .map_err(|err| self.fail_with(span, ParseError::Failed, err))?;

        let report = mode.contains(Mode::ALLOW_MATCHES);
        let matches = matches::resolve(
            &node,
            context,
            token,
            &self.handlers,
            C::MAX_DNODE_COUNT,
            &mut |name, kind| {
                if report {
                    out.on_match(name, kind);
                }
            },
        );

        if mode.contains(Mode::ALLOW_BEST_MATCH) && matches.count() > 0 {
            out.on_best_match(matches.best(), span);
        }
        Ok(matches)
    }

    fn fail(&mut self, span: Span, err: ParseError) -> ParseError {
        self.error = Some(span);
        err
    }

    fn fail_with(&mut self, span: Span, err: ParseError, cause: CliError) -> ParseError {
        self.cause = Some(cause);
        self.fail(span, err)
    }

    /// Print `name = text` for a value. Failures are reported at `span`.
    fn print_value<O: Output>(
        &mut self,
        value: &Value,
        out: &mut O,
        span: Span,
    ) -> Result<(), ParseError> {
        let text = match value.binding.load(value.kind) {
            Some(data) => value::to_text(value.kind, &data, value.units),
            None => self
                .handlers
                .get_value(value, &self.position)
                .and_then(|data| value::to_text(value.kind, &data, value.units)),
        };
        let text = text.map_err(|err| self.fail_with(span, ParseError::ValueFailed, err))?;

        write!(out, "{} = {}\r\n", value.name, text)
            .map_err(|_| self.fail_with(span, ParseError::Failed, CliError::IoError))
    }

    /// Convert `literal` and, when executing, store it.
    fn write_value(&mut self, value: &Value, literal: &str, exec: bool) -> Result<(), CliError> {
        let data = value::from_text(value.kind, literal)?;
        if !exec {
            return Ok(());
        }

        crate::debug!(id = value.id, "writing value");
        if value.binding.is_accessor() {
            self.handlers.set_value(value, &self.position, data)
        } else {
            value.binding.store(data)
        }
    }

    /// List everything available at the working node.
    fn print_help<O: Output>(&self, out: &mut O) -> Result<(), CliError> {
        const UNAVAILABLE: &str = "help unavailable";
        const WIDTH: usize = 16;

        let node = self.current_node()?;
        for subnode in node.subnodes() {
            write!(
                out,
                "{:<WIDTH$}{}\r\n",
                subnode.name,
                subnode.help.unwrap_or(UNAVAILABLE)
            )?;
        }
        for dnode in node.dnodes() {
            let pad = WIDTH.saturating_sub(dnode.name.len() + 3);
            write!(
                out,
                "{}<N>{:pad$}{}\r\n",
                dnode.name,
                "",
                dnode.help.unwrap_or(UNAVAILABLE)
            )?;
        }
        for value in node.values() {
            write!(
                out,
                "{:<WIDTH$}{}\r\n",
                value.name,
                value.help.unwrap_or(UNAVAILABLE)
            )?;
        }
        for command in node.commands() {
            write!(
                out,
                "{:<WIDTH$}{}\r\n",
                command.name,
                command.help.unwrap_or(UNAVAILABLE)
            )?;
        }
        Ok(())
    }
}

impl<H: Handlers + core::fmt::Debug, C: CliConfig> core::fmt::Debug for Parser<'_, H, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Parser")
            .field("root", &self.root.name)
            .field("position", &self.position)
            .field("handlers", &self.handlers)
            .field("error", &self.error)
            .field("cause", &self.cause)
            .finish()
    }
}
