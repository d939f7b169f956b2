//! Match resolver.
//!
//! Classifies one token against everything that is valid at the working node
//! in the current parsing context. Matching is by prefix: a token matches
//! every candidate whose name starts with it, which gives abbreviations
//! (a unique prefix is as good as the full name) and completion lists (the
//! empty token matches everything).
//!
//! Every candidate, ambiguous or not, is folded into the best match: the
//! longest common prefix of all candidate names seen for the token.

use crate::handler::Handlers;
use crate::io::MatchKind;
use crate::tree::{Command, DynamicNode, Node, NodeName, NodeView, Value};

/// Parsing context, selects which match domains are active.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Context {
    /// Expecting a special token or a subnode, value or command name
    Node,

    /// A value name was just matched; `=` assigns, anything else reads it
    ValueOperator,

    /// `=` was just matched; the next token is the literal
    ValueLiteral,
}

/// Identity of a matched candidate.
#[derive(Debug, Copy, Clone)]
pub enum Match {
    /// `..`
    Up,

    /// `/`
    Root,

    /// `?`
    Help,

    /// Static subnode
    Subnode(&'static Node),

    /// Instance of a dynamic node family
    DynamicSubnode {
        /// Family descriptor
        dnode: &'static DynamicNode,

        /// Instance index
        index: u32,
    },

    /// Configuration value
    Value(&'static Value),

    /// Executable command
    Command(&'static Command),

    /// `=`
    Operator,

    /// Value literal (any token in `ValueLiteral` context)
    Literal,
}

/// Result of resolving one token.
#[derive(Debug, Clone)]
pub struct Matches {
    count: usize,
    found: Option<Match>,
    best: NodeName,
    truncated: bool,
}

impl Matches {
    fn new() -> Self {
        Self {
            count: 0,
            found: None,
            best: NodeName::new(),
            truncated: false,
        }
    }

    /// Number of candidates the token is a prefix of.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The matched candidate, if the match is unique.
    pub fn unique(&self) -> Option<Match> {
        if self.count == 1 { self.found } else { None }
    }

    /// Longest common prefix of all candidate names.
    ///
    /// Empty when nothing matched.
    pub fn best(&self) -> &str {
        self.best.as_str()
    }

    /// Whether `best` is the whole common prefix.
    ///
    /// False when the prefix is longer than `NAME_CAPACITY` and `best` holds
    /// only its head.
    pub fn best_is_complete(&self) -> bool {
        !self.truncated
    }

    fn add(&mut self, found: Match, name: &str) {
        self.count += 1;
        self.found = Some(found);

        if self.count == 1 {
            self.best.clear();
            self.truncated = false;
            for c in name.chars() {
                if self.best.push(c).is_err() {
                    self.truncated = true;
                    break;
                }
            }
        } else {
            let common = common_prefix_len(self.best.as_str(), name);
            if common < self.best.len() {
                // Diverges inside the stored head, so the prefix is exact
                self.best.truncate(common);
                self.truncated = false;
            }
        }
    }
}

/// Length in bytes of the longest common prefix of `a` and `b`.
///
/// Always falls on a char boundary of both strings.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| {
            // One is a prefix of the other
            let shorter = if a.len() <= b.len() { a } else { b };
            shorter.len()
        })
}

const SPECIALS: [(&str, Match); 3] = [("..", Match::Up), ("/", Match::Root), ("?", Match::Help)];

/// Resolve `token` at `node`.
///
/// `on_match` is called with every matching name (subnodes, dynamic
/// instances, values, commands; not special tokens). At most
/// `max_dnode_count` instances are tried per dynamic node family.
pub fn resolve<H: Handlers + ?Sized>(
    node: &NodeView<'_>,
    context: Context,
    token: &str,
    handlers: &H,
    max_dnode_count: u32,
    on_match: &mut dyn FnMut(&str, MatchKind),
) -> Matches {
    let mut matches = Matches::new();

    if context == Context::ValueLiteral {
        matches.add(Match::Literal, token);
        return matches;
    }

    for (literal, special) in SPECIALS {
        if literal.starts_with(token) {
            matches.add(special, literal);
        }
    }

    if context == Context::ValueOperator && "=".starts_with(token) {
        matches.add(Match::Operator, "=");
    }

    for &subnode in node.subnodes() {
        if subnode.name.starts_with(token) {
            matches.add(Match::Subnode(subnode), subnode.name);
            on_match(subnode.name, MatchKind::Node);
        }
    }

    for &dnode in node.dnodes() {
        for index in 0..max_dnode_count {
            let Some(instance) = handlers.create_node(dnode, index) else {
                break;
            };
            if instance.name().starts_with(token) {
                matches.add(Match::DynamicSubnode { dnode, index }, instance.name());
                on_match(instance.name(), MatchKind::Node);
            }
        }
    }

    for &value in node.values() {
        if value.name.starts_with(token) {
            matches.add(Match::Value(value), value.name);
            on_match(value.name, MatchKind::Value);
        }
    }

    for &command in node.commands() {
        if command.name.starts_with(token) {
            matches.add(Match::Command(command), command.name);
            on_match(command.name, MatchKind::Command);
        }
    }

    crate::debug!(
        token,
        count = matches.count,
        best = matches.best(),
        complete = !matches.truncated,
        "resolved token"
    );
    matches
}
