/*!
[`RootNode`]: a [`Node`] extended with everything that belongs to the tree as
a whole rather than to any one node: the source text, the global error
list, and the tag-name sets that govern serialization.
*/

use std::collections::HashMap;
use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use crate::error::{Error, ErrorLevel};
use crate::node::Node;

/// The root of a parsed tree. Wraps [`Node`] (via `Deref`/`DerefMut`, so all
/// of `Node`'s query methods are available directly on a `RootNode`) and
/// additionally owns the full source text, the sorted error list, and the
/// three tag-name sets that govern serialization (`empty_tags`,
/// `inline_tags`, `string_tags`).
#[derive(Debug, Clone)]
pub struct RootNode {
    root: Node,
    source: Box<str>,
    errors: Vec<Error>,
    empty_tags: HashSet<Box<str>>,
    inline_tags: HashSet<Box<str>>,
    string_tags: HashSet<Box<str>>,
    variable_stacks: HashMap<String, Vec<String>>,
}

impl RootNode {
    /// Wrap `root` as the root of a tree parsed from `source`.
    pub fn new(root: Node, source: impl Into<Box<str>>) -> Self {
        RootNode {
            root,
            source: source.into(),
            errors: Vec::new(),
            empty_tags: HashSet::new(),
            inline_tags: HashSet::new(),
            string_tags: HashSet::new(),
            variable_stacks: HashMap::new(),
        }
    }

    /// A read-only snapshot of every named capture stack's contents at the
    /// end of the parse (most recently pushed value last), for debugging
    /// context-sensitive grammars (`Capture`/`Retrieve`/`Pop`).
    pub fn variable_stacks(&self) -> &HashMap<String, Vec<String>> {
        &self.variable_stacks
    }

    /// Record the variable-stack snapshot taken at the end of a parse.
    /// Called by [`crate`]'s caller (the `dhparser-parse` crate) once
    /// parsing has completed; not meant to be called by transformers.
    pub fn set_variable_stacks(&mut self, stacks: HashMap<String, Vec<String>>) {
        self.variable_stacks = stacks;
    }

    /// The full source text this tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Record an error against this tree.
    pub fn push_error(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// Record several errors at once.
    pub fn extend_errors(&mut self, errors: impl IntoIterator<Item = Error>) {
        self.errors.extend(errors);
    }

    /// All recorded errors, sorted ascending by position, then by descending
    /// severity (`FATAL` before `WARNING` at the same position), then by
    /// code.
    pub fn errors_sorted(&self) -> Vec<Error> {
        let mut errors = self.errors.clone();
        errors.sort_by(Error::cmp_for_sort);
        errors
    }

    /// True if any recorded error is at least `ErrorLevel::Error` severity.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| e.level >= ErrorLevel::Error)
    }

    /// True if any recorded error is `ErrorLevel::Fatal`; the tree should
    /// be treated as unreliable by downstream consumers.
    pub fn has_fatal_errors(&self) -> bool {
        self.errors.iter().any(|e| e.level == ErrorLevel::Fatal)
    }

    /// Tags that render self-closing in XML serialization.
    pub fn empty_tags(&self) -> &HashSet<Box<str>> {
        &self.empty_tags
    }

    /// Mark a tag as "empty" (self-closing in XML).
    pub fn add_empty_tag(&mut self, tag: impl Into<Box<str>>) {
        self.empty_tags.insert(tag.into());
    }

    /// Tags that suppress whitespace injection between children.
    pub fn inline_tags(&self) -> &HashSet<Box<str>> {
        &self.inline_tags
    }

    /// Mark a tag as "inline".
    pub fn add_inline_tag(&mut self, tag: impl Into<Box<str>>) {
        self.inline_tags.insert(tag.into());
    }

    /// Tags that render as bare text rather than a tagged element.
    pub fn string_tags(&self) -> &HashSet<Box<str>> {
        &self.string_tags
    }

    /// Mark a tag as a "string" tag (renders as bare text).
    pub fn add_string_tag(&mut self, tag: impl Into<Box<str>>) {
        self.string_tags.insert(tag.into());
    }

    /// Borrow the underlying root [`Node`].
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Mutably borrow the underlying root [`Node`]. Meant to be used only by
    /// the transformation engine.
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }
}

impl Deref for RootNode {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.root
    }
}

impl DerefMut for RootNode {
    fn deref_mut(&mut self) -> &mut Node {
        &mut self.root
    }
}
