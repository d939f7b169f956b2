//! Test fixtures and utilities for treecli testing.
//!
//! Provides:
//! - `MockIo`: Test implementation of CharIo trait
//! - `MockHandlers`: Command, accessor and dynamic node handlers with state
//! - `Recorder`: Output sink capturing text and completion callbacks
//! - `TEST_TREE`: Command tree for testing
//!
//! Bound values (`VERBOSE`, `CONSOLE_SPEED`) are process-wide statics shared
//! by all tests of a binary; each is written by a single test only.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use treecli::error::{CliError, Span};
use treecli::handler::Handlers;
use treecli::io::{CharIo, MatchKind, Output};
use treecli::tree::position::Position;
use treecli::tree::{Command, DynamicNode, Node, NodeView, Value};
use treecli::value::{Binding, ValueData, ValueKind};

use std::sync::atomic::{AtomicBool, AtomicU32};

// ============================================================================
// MockIo - Test I/O Implementation
// ============================================================================

/// Mock I/O for testing.
///
/// Provides in-memory character I/O with input queue and output capture.
#[derive(Debug, Default)]
pub struct MockIo {
    /// Input queue (simulates user typing)
    input: VecDeque<char>,

    /// Output capture (collects all output)
    output: String,
}

impl MockIo {
    /// Create new MockIo with empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create MockIo with pre-loaded input string.
    pub fn with_input(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            output: String::new(),
        }
    }

    /// Add input to queue (simulates user typing).
    pub fn push_input(&mut self, s: &str) {
        self.input.extend(s.chars());
    }

    /// Get captured output.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Clear output buffer.
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Check if input queue is empty.
    pub fn input_empty(&self) -> bool {
        self.input.is_empty()
    }
}

impl CharIo for MockIo {
    type Error = ();

    fn get_char(&mut self) -> Result<Option<char>, Self::Error> {
        Ok(self.input.pop_front())
    }

    fn put_char(&mut self, c: char) -> Result<(), Self::Error> {
        self.output.push(c);
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.output.push_str(s);
        Ok(())
    }
}

// ============================================================================
// Recorder - Output Sink
// ============================================================================

/// Output sink recording printed text and completion callbacks.
#[derive(Debug, Default)]
pub struct Recorder {
    /// Printed text
    pub text: String,

    /// `on_match` calls in order
    pub matches: Vec<(String, MatchKind)>,

    /// `on_best_match` calls in order
    pub best: Vec<(String, Span)>,
}

impl Recorder {
    /// Create empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names passed to `on_match`.
    pub fn match_names(&self) -> Vec<&str> {
        self.matches.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl fmt::Write for Recorder {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.text.push_str(s);
        Ok(())
    }
}

impl Output for Recorder {
    fn on_match(&mut self, name: &str, kind: MatchKind) {
        self.matches.push((name.to_string(), kind));
    }

    fn on_best_match(&mut self, best: &str, span: Span) {
        self.best.push((best.to_string(), span));
    }
}

// ============================================================================
// MockHandlers - Handlers with State
// ============================================================================

/// Number of interfaces reported by default (`ethernet0` to `ethernet6`).
pub const INTERFACE_COUNT: u32 = 7;

/// Handlers backing the accessor values and commands of `TEST_TREE`.
#[derive(Debug)]
pub struct MockHandlers {
    /// IDs of executed commands, in order
    pub executed: Vec<&'static str>,

    /// Command ID that reports failure
    pub failing: Option<&'static str>,

    /// Number of `ethernet<N>` instances
    pub interfaces: u32,

    /// `system hostname`
    pub hostname: String,

    /// `interface ethernet<N> mtu`, indexed by N
    pub mtu: Vec<u32>,

    /// `interface ethernet<N> enabled`, indexed by N
    pub enabled: Vec<bool>,

    /// `inpower source voltage`
    pub voltage: i32,

    /// `inpower source capacity`
    pub capacity: u32,
}

impl Default for MockHandlers {
    fn default() -> Self {
        Self {
            executed: Vec::new(),
            failing: None,
            interfaces: INTERFACE_COUNT,
            hostname: String::from("node-1"),
            mtu: vec![1500; INTERFACE_COUNT as usize],
            enabled: vec![true; INTERFACE_COUNT as usize],
            voltage: 3300,
            capacity: 2048,
        }
    }
}

impl MockHandlers {
    /// Handlers whose command `id` fails.
    pub fn failing(id: &'static str) -> Self {
        Self {
            failing: Some(id),
            ..Self::default()
        }
    }

    /// Interface the position is inside of.
    fn interface(&self, position: &Position<'_>) -> Result<usize, CliError> {
        position
            .dynamic_index("if")
            .map(|index| index as usize)
            .filter(|&index| index < self.mtu.len())
            .ok_or(CliError::NodeUnavailable)
    }
}

impl Handlers for MockHandlers {
    fn execute(
        &mut self,
        command: &Command,
        position: &Position<'_>,
        out: &mut dyn fmt::Write,
    ) -> Result<(), CliError> {
        if self.failing == Some(command.id) {
            return Err(CliError::command_failed("refused"));
        }
        self.executed.push(command.id);
        match command.id {
            "inpower_reboot" => out.write_str("rebooting\r\n")?,
            "if_status" => {
                let index = self.interface(position)?;
                let state = if self.enabled[index] { "up" } else { "down" };
                write!(out, "ethernet{} link {}\r\n", index, state)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn get_value(&self, value: &Value, position: &Position<'_>) -> Result<ValueData<'_>, CliError> {
        match value.id {
            "hostname" => Ok(ValueData::Text(&self.hostname)),
            "if_mtu" => Ok(ValueData::UInt(self.mtu[self.interface(position)?])),
            "if_enabled" => Ok(ValueData::Bool(self.enabled[self.interface(position)?])),
            "source_voltage" => Ok(ValueData::Int(self.voltage)),
            "source_capacity" => Ok(ValueData::UInt(self.capacity)),
            _ => Err(CliError::other("no such value")),
        }
    }

    fn set_value(
        &mut self,
        value: &Value,
        position: &Position<'_>,
        data: ValueData<'_>,
    ) -> Result<(), CliError> {
        match (value.id, data) {
            ("hostname", ValueData::Text(text)) => self.hostname = text.to_string(),
            ("if_mtu", ValueData::UInt(mtu)) if mtu >= 68 => {
                let index = self.interface(position)?;
                self.mtu[index] = mtu;
            }
            ("if_mtu", ValueData::UInt(_)) => {
                return Err(CliError::InvalidValue {
                    expected: "mtu of at least 68",
                });
            }
            ("if_enabled", ValueData::Bool(enabled)) => {
                let index = self.interface(position)?;
                self.enabled[index] = enabled;
            }
            ("source_voltage", ValueData::Int(voltage)) => self.voltage = voltage,
            ("source_capacity", ValueData::UInt(capacity)) => self.capacity = capacity,
            _ => return Err(CliError::TypeMismatch),
        }
        Ok(())
    }

    fn create_node(&self, dnode: &DynamicNode, index: u32) -> Option<NodeView<'static>> {
        match dnode.id {
            "if" if index < self.interfaces => dnode.instance(index, &ETHERNET),
            _ => None,
        }
    }
}

// ============================================================================
// TEST_TREE - Command Tree for Testing
// ============================================================================

/// Bound to `system verbose`
pub static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Bound to `system bootloader console-speed`
pub static CONSOLE_SPEED: AtomicU32 = AtomicU32::new(0);

/// Test command: system quit
pub static CMD_QUIT: Command = Command {
    id: "system_quit",
    name: "quit",
    help: Some("Leave the session"),
};

/// Test command: inpower poweroff
pub static CMD_POWEROFF: Command = Command {
    id: "inpower_poweroff",
    name: "poweroff",
    help: Some("Switch the board off"),
};

/// Test command: inpower reboot
pub static CMD_REBOOT: Command = Command {
    id: "inpower_reboot",
    name: "reboot",
    help: None,
};

/// Test command: interface ethernet<N> status
pub static CMD_IF_STATUS: Command = Command {
    id: "if_status",
    name: "status",
    help: Some("Link status"),
};

/// Test value: system verbose (bound)
pub static VAL_VERBOSE: Value = Value {
    id: "verbose",
    name: "verbose",
    help: Some("Verbose logging"),
    kind: ValueKind::Bool,
    binding: Binding::Bool(&VERBOSE),
    default: Some(ValueData::Bool(false)),
    units: None,
};

/// Test value: system hostname (accessor)
pub static VAL_HOSTNAME: Value = Value {
    id: "hostname",
    name: "hostname",
    help: None,
    kind: ValueKind::String,
    binding: Binding::Accessor,
    default: Some(ValueData::Text("ignored")),
    units: None,
};

/// Test value: system clock (unsupported type)
pub static VAL_CLOCK: Value = Value {
    id: "clock",
    name: "clock",
    help: None,
    kind: ValueKind::Time,
    binding: Binding::Unbound,
    default: None,
    units: None,
};

/// Test value: system bootloader console-speed (bound)
pub static VAL_CONSOLE_SPEED: Value = Value {
    id: "console_speed",
    name: "console-speed",
    help: Some("Console baud rate"),
    kind: ValueKind::UInt32,
    binding: Binding::UInt(&CONSOLE_SPEED),
    default: Some(ValueData::UInt(115200)),
    units: None,
};

/// Test value: system bootloader banner (unbound)
pub static VAL_BANNER: Value = Value {
    id: "banner",
    name: "banner",
    help: None,
    kind: ValueKind::String,
    binding: Binding::Unbound,
    default: None,
    units: None,
};

/// Test value: interface ethernet<N> mtu (accessor)
pub static VAL_MTU: Value = Value {
    id: "if_mtu",
    name: "mtu",
    help: None,
    kind: ValueKind::UInt32,
    binding: Binding::Accessor,
    default: None,
    units: None,
};

/// Test value: interface ethernet<N> enabled (accessor)
pub static VAL_ENABLED: Value = Value {
    id: "if_enabled",
    name: "enabled",
    help: None,
    kind: ValueKind::Bool,
    binding: Binding::Accessor,
    default: None,
    units: None,
};

/// Test value: inpower source voltage (accessor, physical)
pub static VAL_VOLTAGE: Value = Value {
    id: "source_voltage",
    name: "voltage",
    help: None,
    kind: ValueKind::Physical,
    binding: Binding::Accessor,
    default: None,
    units: Some("mV"),
};

/// Test value: inpower source capacity (accessor, data)
pub static VAL_CAPACITY: Value = Value {
    id: "source_capacity",
    name: "capacity",
    help: None,
    kind: ValueKind::Data,
    binding: Binding::Accessor,
    default: None,
    units: None,
};

/// Test node: system bootloader
pub static NODE_BOOTLOADER: Node = Node {
    help: Some("Bootloader settings"),
    values: &[&VAL_CONSOLE_SPEED, &VAL_BANNER],
    ..Node::new("bootloader")
};

/// Test node: system
pub static NODE_SYSTEM: Node = Node {
    help: Some("System settings"),
    subnodes: &[&NODE_BOOTLOADER],
    commands: &[&CMD_QUIT],
    values: &[&VAL_VERBOSE, &VAL_HOSTNAME, &VAL_CLOCK],
    ..Node::new("system")
};

/// Body of every interface instance
pub static ETHERNET: Node = Node {
    help: Some("Ethernet interface"),
    commands: &[&CMD_IF_STATUS],
    values: &[&VAL_MTU, &VAL_ENABLED],
    ..Node::new("ethernet")
};

/// Test dynamic node family: interface ethernet<N>
pub static DNODE_IF: DynamicNode = DynamicNode {
    id: "if",
    name: "ethernet",
    help: Some("Ethernet interfaces"),
};

/// Test node: interface
pub static NODE_INTERFACE: Node = Node {
    help: Some("Network interfaces"),
    dnodes: &[&DNODE_IF],
    ..Node::new("interface")
};

/// Test node: inpower source
pub static NODE_SOURCE: Node = Node {
    values: &[&VAL_VOLTAGE, &VAL_CAPACITY],
    ..Node::new("source")
};

/// Test node: inpower
pub static NODE_INPOWER: Node = Node {
    help: Some("Input power"),
    subnodes: &[&NODE_SOURCE],
    commands: &[&CMD_POWEROFF, &CMD_REBOOT],
    ..Node::new("inpower")
};

/// Root node for testing.
///
/// Structure:
/// ```text
/// /
/// ├── system/
/// │   ├── bootloader/
/// │   │   ├── console-speed (UInt32, bound, default 115200)
/// │   │   └── banner (String, unbound)
/// │   ├── verbose (Bool, bound)
/// │   ├── hostname (String, accessor)
/// │   ├── clock (Time, unbound)
/// │   └── quit
/// ├── interface/
/// │   └── ethernet<N>/ (N < interfaces)
/// │       ├── mtu (UInt32, accessor)
/// │       ├── enabled (Bool, accessor)
/// │       └── status
/// └── inpower/
///     ├── source/
///     │   ├── voltage (Physical mV, accessor)
///     │   └── capacity (Data, accessor)
///     ├── poweroff
///     └── reboot
/// ```
pub static TEST_TREE: Node = Node {
    subnodes: &[&NODE_SYSTEM, &NODE_INTERFACE, &NODE_INPOWER],
    ..Node::new("/")
};

#[cfg(test)]
mod tests {
    use super::*;
    use treecli::tree::position::Level;

    #[test]
    fn test_mock_io_basic() {
        let mut io = MockIo::new();

        io.push_input("hi");
        assert_eq!(io.get_char().unwrap(), Some('h'));
        assert_eq!(io.get_char().unwrap(), Some('i'));
        assert_eq!(io.get_char().unwrap(), None);
        assert!(io.input_empty());

        io.put_char('x').unwrap();
        CharIo::write_str(&mut io, "yz").unwrap();
        assert_eq!(io.output(), "xyz");
    }

    #[test]
    fn test_tree_structure() {
        assert_eq!(TEST_TREE.subnodes.len(), 3);
        let system = TEST_TREE.find_subnode("system").unwrap();
        assert!(system.find_subnode("bootloader").is_some());
        assert!(system.find_command("quit").is_some());
        assert!(system.find_value("verbose").is_some());
    }

    #[test]
    fn test_mock_handlers_create_node() {
        let handlers = MockHandlers::default();
        assert_eq!(handlers.create_node(&DNODE_IF, 6).unwrap().name(), "ethernet6");
        assert!(handlers.create_node(&DNODE_IF, INTERFACE_COUNT).is_none());
    }

    #[test]
    fn test_mock_handlers_keep_state_per_interface() {
        let mut handlers = MockHandlers::default();
        let mut pos = Position::new(4);
        pos.push(Level::Static(&NODE_INTERFACE)).unwrap();
        pos.push(Level::Dynamic {
            dnode: &DNODE_IF,
            index: 3,
        })
        .unwrap();

        handlers.set_value(&VAL_MTU, &pos, ValueData::UInt(576)).unwrap();
        assert_eq!(handlers.mtu[3], 576);
        assert_eq!(handlers.mtu[0], 1500);

        let root = Position::new(4);
        assert_eq!(
            handlers.get_value(&VAL_MTU, &root).unwrap_err(),
            CliError::NodeUnavailable
        );
    }
}
