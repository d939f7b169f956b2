//! Working position in the command tree.
//!
//! A position is a bounded stack of levels from the root to the working
//! node. Depth 0 means "at root". Dynamic levels store only the descriptor
//! and index; the node itself is recreated through the session's
//! [`Handlers`] whenever it is needed.
//!
//! Snapshots are plain clones: the parser clones the position before a line
//! and assigns the clone back to roll the line's moves back.

use crate::config::DEPTH_CAPACITY;
use crate::error::CliError;
use crate::handler::Handlers;
use crate::tree::{DynamicNode, Node, NodeView};
use core::fmt::{self, Write};

/// One step of a position.
#[derive(Debug, Copy, Clone)]
pub enum Level<'t> {
    /// Static subnode
    Static(&'t Node),

    /// Instance `index` of a dynamic node family
    Dynamic {
        /// Family descriptor
        dnode: &'t DynamicNode,

        /// Instance index
        index: u32,
    },
}

impl<'t> Level<'t> {
    /// Node view of this level.
    pub fn view<H: Handlers + ?Sized>(&self, handlers: &H) -> Result<NodeView<'t>, CliError> {
        match *self {
            Level::Static(node) => Ok(NodeView::from_static(node)),
            Level::Dynamic { dnode, index } => handlers
                .create_node(dnode, index)
                .ok_or(CliError::NodeUnavailable),
        }
    }
}

// Levels compare by identity: two static levels are equal only if they refer
// to the same node item.
impl PartialEq for Level<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Level::Static(a), Level::Static(b)) => core::ptr::eq(*a, *b),
            (
                Level::Dynamic { dnode: a, index: i },
                Level::Dynamic { dnode: b, index: j },
            ) => core::ptr::eq(*a, *b) && i == j,
            _ => false,
        }
    }
}

impl Eq for Level<'_> {}

/// Bounded stack of levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position<'t> {
    levels: heapless::Vec<Level<'t>, DEPTH_CAPACITY>,
    max_depth: usize,
}

impl<'t> Position<'t> {
    /// Position at root, allowing up to `max_depth` levels.
    ///
    /// `max_depth` is clamped to `DEPTH_CAPACITY`.
    pub fn new(max_depth: usize) -> Self {
        Self {
            levels: heapless::Vec::new(),
            max_depth: max_depth.min(DEPTH_CAPACITY),
        }
    }

    /// Number of levels below the root.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Maximum depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// True at depth 0.
    pub fn is_root(&self) -> bool {
        self.levels.is_empty()
    }

    /// Levels from the root down.
    pub fn levels(&self) -> &[Level<'t>] {
        &self.levels
    }

    /// Descend one level.
    ///
    /// Fails with `PathTooDeep` at maximum depth, leaving the position
    /// unchanged.
    pub fn push(&mut self, level: Level<'t>) -> Result<(), CliError> {
        if self.levels.len() >= self.max_depth {
            return Err(CliError::PathTooDeep);
        }
        self.levels.push(level).map_err(|_| CliError::PathTooDeep)
    }

    /// Ascend one level.
    ///
    /// Fails with `AtRoot` at depth 0, leaving the position unchanged.
    pub fn pop(&mut self) -> Result<Level<'t>, CliError> {
        self.levels.pop().ok_or(CliError::AtRoot)
    }

    /// Index of the innermost dynamic level whose family has id `id`.
    ///
    /// Handlers use it to tell instances of a family apart, e.g. which
    /// `ethernet<N>` a command runs in.
    pub fn dynamic_index(&self, id: &str) -> Option<u32> {
        self.levels.iter().rev().find_map(|level| match level {
            Level::Dynamic { dnode, index } if dnode.id == id => Some(*index),
            _ => None,
        })
    }

    /// Return to the root.
    pub fn reset(&mut self) {
        self.levels.clear();
    }

    /// Working node.
    ///
    /// The root at depth 0, otherwise the top level (materialized through
    /// `handlers` for dynamic levels).
    pub fn current_node<H: Handlers + ?Sized>(
        &self,
        root: &'t Node,
        handlers: &H,
    ) -> Result<NodeView<'t>, CliError> {
        match self.levels.last() {
            None => Ok(NodeView::from_static(root)),
            Some(level) => level.view(handlers),
        }
    }

    /// Write the path of the working node, e.g. `/system/ethernet0`.
    ///
    /// The root alone is written as `/`.
    pub fn write_path<H: Handlers + ?Sized>(
        &self,
        handlers: &H,
        out: &mut dyn fmt::Write,
    ) -> Result<(), CliError> {
        if self.levels.is_empty() {
            out.write_char('/')?;
            return Ok(());
        }
        for level in &self.levels {
            let view = level.view(handlers)?;
            write!(out, "/{}", view.name())?;
        }
        Ok(())
    }
}
