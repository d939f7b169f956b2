//! Command tree data structures.
//!
//! Nodes, commands, values and dynamic node descriptors. All tree structures
//! are const-initializable and meant to live in `static` items; the parser
//! only ever reads them.
//!
//! Execution logic is kept out of the tree: commands, accessor values and
//! dynamic node factories are identified by `id` and served by a
//! [`Handlers`](crate::handler::Handlers) implementation.

use crate::config::NAME_CAPACITY;
use crate::error::CliError;
use crate::value::{Binding, ValueData, ValueKind};
use core::fmt::{self, Write};

// Sub-modules
pub mod position;

/// Name of a materialized node.
pub type NodeName = heapless::String<NAME_CAPACITY>;

/// Executable command metadata.
#[derive(Debug, Clone)]
pub struct Command {
    /// Unique identifier passed to `Handlers::execute`
    pub id: &'static str,

    /// Command name
    pub name: &'static str,

    /// Help text (shown by `?`)
    pub help: Option<&'static str>,
}

/// Configuration value metadata.
#[derive(Debug, Clone)]
pub struct Value {
    /// Unique identifier passed to accessor handlers
    pub id: &'static str,

    /// Value name
    pub name: &'static str,

    /// Help text (shown by `?`)
    pub help: Option<&'static str>,

    /// Value type
    pub kind: ValueKind,

    /// Storage of the value; must accept `kind` (checked by
    /// `Node::apply_defaults`)
    pub binding: Binding,

    /// Applied by `Node::apply_defaults`; ignored for accessor values
    pub default: Option<ValueData<'static>>,

    /// Units suffix for `Physical` values
    pub units: Option<&'static str>,
}

/// Dynamic node descriptor.
///
/// Describes a family of child nodes generated at runtime, one per index
/// (e.g. one per network interface). Instances are produced by
/// `Handlers::create_node` and never cached.
#[derive(Debug, Clone)]
pub struct DynamicNode {
    /// Unique identifier passed to `Handlers::create_node`
    pub id: &'static str,

    /// Name prefix of generated nodes
    pub name: &'static str,

    /// Help text (shown by `?`)
    pub help: Option<&'static str>,
}

/// Static tree node.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node name (the root is conventionally named "/")
    pub name: &'static str,

    /// Help text (shown by `?`)
    pub help: Option<&'static str>,

    /// Child nodes
    pub subnodes: &'static [&'static Node],

    /// Dynamic child node families
    pub dnodes: &'static [&'static DynamicNode],

    /// Commands available at this node
    pub commands: &'static [&'static Command],

    /// Values available at this node
    pub values: &'static [&'static Value],
}

impl Node {
    /// Empty node, usable as a base for struct update syntax.
    ///
    /// ```rust,ignore
    /// static SYSTEM: Node = Node {
    ///     commands: &[&QUIT],
    ///     ..Node::new("system")
    /// };
    /// ```
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            help: None,
            subnodes: &[],
            dnodes: &[],
            commands: &[],
            values: &[],
        }
    }

    /// Find child node by exact name.
    pub fn find_subnode(&self, name: &str) -> Option<&'static Node> {
        self.subnodes.iter().find(|n| n.name == name).copied()
    }

    /// Find value by exact name.
    pub fn find_value(&self, name: &str) -> Option<&'static Value> {
        self.values.iter().find(|v| v.name == name).copied()
    }

    /// Find command by exact name.
    pub fn find_command(&self, name: &str) -> Option<&'static Command> {
        self.commands.iter().find(|c| c.name == name).copied()
    }

    /// Store every default value of this subtree into its bound cell.
    ///
    /// Accessor values are skipped. Only static subnodes are visited.
    pub fn apply_defaults(&self) -> Result<(), CliError> {
        for value in self.values {
            if !value.binding.accepts(value.kind) {
                crate::debug!(value = value.name, "binding does not hold value kind");
                return Err(CliError::TypeMismatch);
            }
            if let Some(default) = value.default
                && !value.binding.is_accessor()
            {
                value.binding.store(default)?;
            }
        }
        for node in self.subnodes {
            node.apply_defaults()?;
        }
        Ok(())
    }

    /// Write an indented outline of this subtree.
    ///
    /// One `* name` line per node, four spaces per level. Dynamic families
    /// are shown as `* name<N>`.
    pub fn write_tree(&self, out: &mut dyn Write, indent: usize) -> fmt::Result {
        write!(out, "{:indent$}* {}\r\n", "", self.name, indent = indent)?;
        for node in self.subnodes {
            node.write_tree(out, indent + 4)?;
        }
        for dnode in self.dnodes {
            write!(out, "{:indent$}* {}<N>\r\n", "", dnode.name, indent = indent + 4)?;
        }
        Ok(())
    }
}

impl DynamicNode {
    /// Materialize instance `index` named `<name><index>` with the children of `body`.
    ///
    /// Returns `None` if the generated name exceeds `NAME_CAPACITY`.
    pub fn instance(&self, index: u32, body: &'static Node) -> Option<NodeView<'static>> {
        let mut name = NodeName::new();
        write!(name, "{}{}", self.name, index).ok()?;
        Some(NodeView::named(name, body))
    }
}

/// Read-only view of a node, static or materialized.
///
/// Materialized views carry their generated name; children and help come
/// from the body node.
#[derive(Debug, Clone)]
pub struct NodeView<'t> {
    body: &'t Node,
    name: Option<NodeName>,
}

impl<'t> NodeView<'t> {
    /// View of a static node.
    pub fn from_static(node: &'t Node) -> Self {
        Self {
            body: node,
            name: None,
        }
    }

    /// View with a generated name and the children of `body`.
    pub fn named(name: NodeName, body: &'t Node) -> Self {
        Self {
            body,
            name: Some(name),
        }
    }

    /// Node name.
    pub fn name(&self) -> &str {
        match &self.name {
            Some(name) => name.as_str(),
            None => self.body.name,
        }
    }

    /// Help text.
    pub fn help(&self) -> Option<&'static str> {
        self.body.help
    }

    /// Child nodes.
    pub fn subnodes(&self) -> &'static [&'static Node] {
        self.body.subnodes
    }

    /// Dynamic child node families.
    pub fn dnodes(&self) -> &'static [&'static DynamicNode] {
        self.body.dnodes
    }

    /// Commands.
    pub fn commands(&self) -> &'static [&'static Command] {
        self.body.commands
    }

    /// Values.
    pub fn values(&self) -> &'static [&'static Value] {
        self.body.values
    }
}
