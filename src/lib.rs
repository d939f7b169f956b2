//! # treecli
//!
//! Hierarchical command and configuration tree interpreter for embedded
//! systems, with zero heap allocation.
//!
//! **Key features:**
//! - **Static trees** - Nodes, commands and values live in `static` items
//! - **Dynamic nodes** - Indexed node families materialized on demand
//! - **Prefix matching** - Unique abbreviations, ambiguity detection and
//!   longest-common-prefix completion
//! - **Typed values** - Bound to atomics or served by accessor handlers
//! - **Atomic lines** - A failed line never moves the working position
//!
//! ```rust,ignore
//! static VERBOSE: AtomicBool = AtomicBool::new(false);
//!
//! static VERBOSE_VALUE: Value = Value {
//!     id: "verbose",
//!     name: "verbose",
//!     help: Some("Verbose logging"),
//!     kind: ValueKind::Bool,
//!     binding: Binding::Bool(&VERBOSE),
//!     default: None,
//!     units: None,
//! };
//!
//! static SYSTEM: Node = Node {
//!     values: &[&VERBOSE_VALUE],
//!     ..Node::new("system")
//! };
//!
//! static ROOT: Node = Node {
//!     subnodes: &[&SYSTEM],
//!     ..Node::new("/")
//! };
//!
//! let mut parser: Parser<'_, _> = Parser::new(&ROOT, NoHandlers);
//! parser.parse_line("system verbose = yes", Mode::EXEC, &mut NullOutput)?;
//! ```
//!
//! ## Optional Features
//!
//! - `shell` (default) - Interactive line shell over a `CharIo` device
//! - `trace` - Parser diagnostics through `tracing` (requires an allocator)
//!
//! This library is `no_std` compatible.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(clippy::result_large_err)]

extern crate heapless;

// Optional dependencies (feature-gated)
#[cfg(feature = "trace")]
extern crate tracing;

// ============================================================================
// Diagnostics
// ============================================================================

#[cfg(feature = "trace")]
macro_rules! debug {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "trace"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

pub(crate) use debug;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod error;
pub mod handler;
pub mod io;
pub mod parser;
pub mod tree;
pub mod value;

#[cfg(feature = "shell")]
pub mod shell;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Configuration
pub use config::{CliConfig, DefaultConfig, MinimalConfig};

// Error types
pub use error::{CliError, ParseError, Span};

// Collaborator interfaces
pub use handler::{Handlers, NoHandlers};
pub use io::{CharIo, MatchKind, NullOutput, Output};

// Tree types
pub use tree::position::{Level, Position};
pub use tree::{Command, DynamicNode, Node, NodeName, NodeView, Value};

// Parser
pub use parser::matches::{Context, Match, Matches};
pub use parser::{Mode, Parser};

// Values
pub use value::{Binding, ValueData, ValueKind};

// Shell
#[cfg(feature = "shell")]
pub use shell::Shell;

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
