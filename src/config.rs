//! Configuration traits and implementations for parser bounds.
//!
//! The `CliConfig` trait allows compile-time configuration of depth limits,
//! enumeration bounds and shell strings without runtime overhead. Storage
//! capacities are fixed crate constants; configured limits are clamped to them.

/// Storage capacity of a position stack (upper bound for `MAX_DEPTH`).
pub const DEPTH_CAPACITY: usize = 16;

/// Capacity of generated node names and the best-match prefix.
pub const NAME_CAPACITY: usize = 32;

/// Capacity of a formatted value.
pub const VALUE_TEXT_CAPACITY: usize = 48;

/// Capacity of the shell input buffer (upper bound for `MAX_INPUT`).
pub const INPUT_CAPACITY: usize = 256;

/// Parser configuration trait defining traversal bounds and shell strings.
///
/// All values are const (zero runtime cost).
pub trait CliConfig {
    /// Maximum tree depth a position can reach (default: 8)
    const MAX_DEPTH: usize;

    /// Maximum number of indices enumerated per dynamic node (default: 32)
    const MAX_DNODE_COUNT: u32;

    /// Maximum shell input length (default: 128)
    const MAX_INPUT: usize;

    /// Text printed before the working path in the prompt
    const PROMPT_PREFIX: &'static str = "cli ";

    /// Text printed after the working path in the prompt
    const PROMPT_SUFFIX: &'static str = " > ";

    /// Banner printed when the shell is activated
    const MSG_WELCOME: &'static str = "treecli ready, type ? for help\r\n";
}

/// Default configuration for typical embedded systems.
///
/// - MAX_DEPTH: 8 levels
/// - MAX_DNODE_COUNT: 32 instances per dynamic node
/// - MAX_INPUT: 128 bytes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DefaultConfig;

impl CliConfig for DefaultConfig {
    const MAX_DEPTH: usize = 8;
    const MAX_DNODE_COUNT: u32 = 32;
    const MAX_INPUT: usize = 128;
}

/// Minimal configuration for resource-constrained systems.
///
/// - MAX_DEPTH: 4 levels
/// - MAX_DNODE_COUNT: 8 instances per dynamic node
/// - MAX_INPUT: 64 bytes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MinimalConfig;

impl CliConfig for MinimalConfig {
    const MAX_DEPTH: usize = 4;
    const MAX_DNODE_COUNT: u32 = 8;
    const MAX_INPUT: usize = 64;
}
