/*!
[`ParserKind`]: the closed, tagged-sum type covering every combinator
variant, dispatched through one `match` rather than a dynamic trait-object
hierarchy. Child parsers are referenced by [`ParserId`], an arena index,
rather than owned pointers or trait objects.
*/

use std::sync::Arc;

use regex::Regex;

use dhparser_stringview::LookbehindPattern;

/// An index into a [`crate::Grammar`]'s parser arena. Cheap to copy, stable
/// for the lifetime of the grammar it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParserId(pub(crate) u32);

impl ParserId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A function applied to the top of a captured-variable stack before
/// comparing it against the input, for [`ParserKind::Retrieve`] and
/// [`ParserKind::Pop`]'s optional "counterpart" transform (e.g. matching a
/// closing bracket against the text of the opening one).
pub type Counterpart = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// An inclusive repetition bound: `(min, max)`, `max = None` meaning
/// unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepetitionBound {
    /// Minimum number of repetitions required to match.
    pub min: usize,
    /// Maximum number of repetitions allowed; `None` for unbounded.
    pub max: Option<usize>,
}

impl RepetitionBound {
    /// A bound requiring exactly `n` repetitions.
    pub fn exact(n: usize) -> Self {
        RepetitionBound { min: n, max: Some(n) }
    }

    /// `min..=max`, `max = None` for unbounded.
    pub fn new(min: usize, max: Option<usize>) -> Self {
        RepetitionBound { min, max }
    }

    pub(crate) fn satisfied_by(&self, count: usize) -> bool {
        count >= self.min
    }

    pub(crate) fn allows_more(&self, count: usize) -> bool {
        self.max.map(|max| count < max).unwrap_or(true)
    }
}

/// One variant per combinator. `Grammar::run` dispatches on this enum
/// exactly once per invocation rather than through virtual calls, so the
/// whole parser graph is a plain, inspectable data structure (useful for
/// left-recursion analysis and the builder's redundancy checks).
#[derive(Debug, Clone)]
pub enum ParserKind {
    /// Matches the exact string. `literal_ws` optionally names a whitespace
    /// parser to post-apply (the "literalws" directive; the EBNF compiler
    /// decides when to wire this up, the runtime only composes it).
    Literal {
        /// The exact text to match.
        text: Box<str>,
        /// Optional trailing-whitespace parser, post-applied on match.
        literal_ws: Option<ParserId>,
    },
    /// Matches a compiled regular expression anchored at the current
    /// position.
    RegExp(Regex),
    /// A distinguished regex parser whose matches are "expendable",
    /// eligible for the transformation engine's `remove_whitespace`.
    Whitespace(Regex),
    /// Wraps a parser; on match, discards the produced node (replacing it
    /// with an empty, anonymous token) while still advancing position.
    Drop(ParserId),
    /// Matches each child in order, concatenating their non-empty children
    /// into a branch. Children at an index `>= mandatory` trigger the
    /// mandatory-continuation error path on failure rather than ordinary
    /// backtracking. `mandatory = usize::MAX` (the default) means "never".
    Series {
        /// The sequence of parsers to match, in order.
        children: Vec<ParserId>,
        /// Index from which a failing child is a `§` violation.
        mandatory: usize,
    },
    /// Returns the first child that matches; no match if all fail. Order
    /// sensitive (PEG semantics, not longest-match).
    Alternative(Vec<ParserId>),
    /// Matches the child or produces an empty match; never fails.
    Option_(ParserId),
    /// Greedy repetition, zero or more; never fails.
    ZeroOrMore(ParserId),
    /// Greedy repetition, one or more; fails on zero matches.
    OneOrMore(ParserId),
    /// Bounded repetition.
    Counted(ParserId, RepetitionBound),
    /// Matches the given parsers in any order, each subject to its own
    /// repetition bound.
    Interleave(Vec<(ParserId, RepetitionBound)>),
    /// Succeeds iff the child matches here; never advances position.
    Lookahead(ParserId),
    /// Succeeds iff the child does *not* match here; never advances
    /// position.
    NegativeLookahead(ParserId),
    /// Succeeds iff some bounded-width suffix of the text already consumed
    /// matches the pattern.
    Lookbehind(LookbehindPattern),
    /// Succeeds iff no bounded-width suffix of the text already consumed
    /// matches the pattern.
    NegativeLookbehind(LookbehindPattern),
    /// Equivalent to the wrapped parser, but converts a no-match into a
    /// mandatory-continuation error (the `§` applied directly to a single
    /// parser rather than a `Series` index).
    Required(ParserId),
    /// On match, pushes the matched text onto the grammar-scoped stack
    /// named `name`.
    Capture {
        /// The name of the variable stack to push onto.
        name: Box<str>,
        /// The parser whose matched text is captured.
        child: ParserId,
    },
    /// Matches only if the input begins with the current top of the named
    /// stack (after applying an optional counterpart transform).
    Retrieve {
        /// The name of the variable stack to read from.
        name: Box<str>,
        /// Optional transform applied to the stack's top value before
        /// comparing it against the input.
        counterpart: Option<Counterpart>,
    },
    /// Like [`ParserKind::Retrieve`], but also pops the stack on success.
    Pop {
        /// The name of the variable stack to read from and pop.
        name: Box<str>,
        /// Optional transform applied to the stack's top value before
        /// comparing it against the input.
        counterpart: Option<Counterpart>,
    },
    /// A placeholder allowing a parser to reference itself or a
    /// later-defined parser. Resolved once by [`crate::GrammarBuilder`]
    /// before the grammar is built; an unresolved forward is a build
    /// error.
    Forward(Option<ParserId>),
    /// A named wrapper that renames its child's result without otherwise
    /// altering it.
    Synonym(ParserId),
}

impl ParserKind {
    /// The `:Ptype` tag associated with each combinator class,
    /// e.g. `:Alternative`, `:Series`, used when a node produced by an
    /// otherwise-unnamed parser needs *some* tag.
    pub fn ptype(&self) -> &'static str {
        match self {
            ParserKind::Literal { .. } => ":Literal",
            ParserKind::RegExp(_) => ":RegExp",
            ParserKind::Whitespace(_) => ":Whitespace",
            ParserKind::Drop(_) => ":Drop",
            ParserKind::Series { .. } => ":Series",
            ParserKind::Alternative(_) => ":Alternative",
            ParserKind::Option_(_) => ":Option",
            ParserKind::ZeroOrMore(_) => ":ZeroOrMore",
            ParserKind::OneOrMore(_) => ":OneOrMore",
            ParserKind::Counted(..) => ":Counted",
            ParserKind::Interleave(_) => ":Interleave",
            ParserKind::Lookahead(_) => ":Lookahead",
            ParserKind::NegativeLookahead(_) => ":NegativeLookahead",
            ParserKind::Lookbehind(_) => ":Lookbehind",
            ParserKind::NegativeLookbehind(_) => ":NegativeLookbehind",
            ParserKind::Required(_) => ":Required",
            ParserKind::Capture { .. } => ":Capture",
            ParserKind::Retrieve { .. } => ":Retrieve",
            ParserKind::Pop { .. } => ":Pop",
            ParserKind::Forward(_) => ":Forward",
            ParserKind::Synonym(_) => ":Synonym",
        }
    }
}
