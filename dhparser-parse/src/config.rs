/*!
Explicit, value-type configuration. A [`Config`] is constructed by the
caller and threaded explicitly into [`crate::Grammar::parse`]; there is no
global or thread-local singleton here; any convenience wrapper that hands
out a default lives above this crate (`dhparser`'s facade).
*/

use std::collections::HashSet;

/// A stage whose syntax tree can be logged for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    /// The concrete syntax tree, straight out of the parser.
    Cst,
    /// The abstract syntax tree, after transformation.
    Ast,
}

/// Process-wide-in-spirit options, reified as an explicit value passed to
/// `Grammar::parse` rather than read from global state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Positive cap on seed-grow left-recursion depth. Default 10.
    #[cfg_attr(feature = "serde", serde(default = "Config::default_left_recursion_depth"))]
    pub left_recursion_depth: u32,
    /// When true, every parser invocation records a
    /// [`crate::HistoryEntry`] (name, location, status, excerpt).
    #[cfg_attr(feature = "serde", serde(default))]
    pub history_tracking: bool,
    /// When true, emit an informational [`dhparser_syntax::Error`] (code
    /// [`dhparser_syntax::RESUME_NOTICE`]) for each resume-rule recovery.
    #[cfg_attr(feature = "serde", serde(default))]
    pub resume_notices: bool,
    /// Stages whose tree should be logged (via `tracing`) after the parse
    /// reaches them.
    #[cfg_attr(feature = "serde", serde(default))]
    pub log_syntax_trees: HashSet<Stage>,
    /// How many characters a mandatory-continuation failure consumes to
    /// advance past the offending point when the enclosing rule has no
    /// `@..._skip` rule registered. Default 1 (a single-character
    /// fallback).
    #[cfg_attr(feature = "serde", serde(default = "Config::default_mandatory_recovery_chars"))]
    pub mandatory_recovery_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            left_recursion_depth: Config::default_left_recursion_depth(),
            history_tracking: false,
            resume_notices: false,
            log_syntax_trees: HashSet::new(),
            mandatory_recovery_chars: Config::default_mandatory_recovery_chars(),
        }
    }
}

impl Config {
    fn default_left_recursion_depth() -> u32 {
        10
    }

    fn default_mandatory_recovery_chars() -> usize {
        1
    }
}
