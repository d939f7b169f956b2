//! Handler trait for commands, accessor values and dynamic nodes.
//!
//! The `Handlers` trait implements the execution side of the
//! metadata/execution separation pattern. Tree items only carry metadata and
//! a unique `id`; everything that runs code is dispatched here by that id.
//! This allows several items with the same display name in different nodes.
//!
//! Commands and accessors also receive the working [`Position`] they run at.
//! Instances of a dynamic node family share one body node, so the position
//! is how a handler tells `ethernet0 mtu` from `ethernet1 mtu`.
//!
//! # Example
//!
//! ```rust,ignore
//! struct Board;
//!
//! impl Handlers for Board {
//!     fn execute(
//!         &mut self,
//!         command: &Command,
//!         position: &Position<'_>,
//!         out: &mut dyn fmt::Write,
//!     ) -> Result<(), CliError> {
//!         match command.id {
//!             "system_reboot" => reboot(),
//!             "system_uptime" => write!(out, "{}s\r\n", uptime()).map_err(CliError::from),
//!             "if_reset" => match position.dynamic_index("if") {
//!                 Some(index) => reset_interface(index),
//!                 None => Err(CliError::NodeUnavailable),
//!             },
//!             _ => Err(CliError::command_failed("unknown command")),
//!         }
//!     }
//!
//!     fn create_node(&self, dnode: &DynamicNode, index: u32) -> Option<NodeView<'static>> {
//!         match dnode.id {
//!             "if" if index < interface_count() => dnode.instance(index, &INTERFACE),
//!             _ => None,
//!         }
//!     }
//! }
//! ```

use crate::error::CliError;
use crate::tree::position::Position;
use crate::tree::{Command, DynamicNode, NodeView, Value};
use crate::value::ValueData;
use core::fmt;

/// Session handlers.
///
/// Only `execute` is required. Accessor reads default to the zero value of
/// the value's type, accessor writes are accepted and dropped, and dynamic
/// nodes are absent.
///
/// All callbacks run synchronously on the parser's stack and must not panic.
pub trait Handlers {
    /// Execute command by unique ID.
    ///
    /// `position` is the level the command was matched at. Output written to
    /// `out` goes straight to the session's print sink.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Command succeeded
    /// - `Err(CliError)`: Line fails with `ParseError::CommandFailed`
    fn execute(
        &mut self,
        command: &Command,
        position: &Position<'_>,
        out: &mut dyn fmt::Write,
    ) -> Result<(), CliError>;

    /// Read an accessor value found at `position`.
    fn get_value(&self, value: &Value, position: &Position<'_>) -> Result<ValueData<'_>, CliError> {
        let _ = position;
        Ok(value.kind.zero())
    }

    /// Write an accessor value found at `position`.
    ///
    /// `data` is already converted to the value's type. `Text` data borrows
    /// from the input line and must be copied if kept.
    fn set_value(
        &mut self,
        value: &Value,
        position: &Position<'_>,
        data: ValueData<'_>,
    ) -> Result<(), CliError> {
        let _ = (value, position, data);
        Ok(())
    }

    /// Materialize instance `index` of a dynamic node family.
    ///
    /// Must be deterministic for a given external state: instances are
    /// never cached and are recreated on every lookup. Returning `None`
    /// ends enumeration of the family.
    fn create_node(&self, dnode: &DynamicNode, index: u32) -> Option<NodeView<'static>> {
        let _ = (dnode, index);
        None
    }
}

/// Handlers for trees without commands, accessors or dynamic nodes.
///
/// Every command fails.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoHandlers;

impl Handlers for NoHandlers {
    fn execute(
        &mut self,
        _command: &Command,
        _position: &Position<'_>,
        _out: &mut dyn fmt::Write,
    ) -> Result<(), CliError> {
        Err(CliError::command_failed("no handler"))
    }
}
