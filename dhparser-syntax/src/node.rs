/*!
[`Node`]: a single element of the concrete/abstract syntax tree. A node is
either a text leaf or an ordered sequence of children, never both; it
carries an optional XML-style attribute map and a source position that is
assigned lazily once a parse completes.
*/

use std::fmt;

use indexmap::IndexMap;

use crate::error::Error;

/// Either leaf text or an ordered list of children. A node is never both at
/// once; this is the type-level expression of that invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Leaf(Box<str>),
    Branch(Vec<Node>),
}

/// A 0-based offset into the source text, or "unset". Modeled as
/// `Option<u32>` internally so the unset state can't be confused with a real
/// offset, while still exposing a literal `-1` convention at the API
/// boundary for callers that want it (e.g. serializers emitting position
/// annotations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Pos(Option<u32>);

impl Pos {
    /// The unset position.
    pub const UNSET: Pos = Pos(None);

    /// A set position at the given byte offset.
    pub fn at(offset: usize) -> Pos {
        Pos(Some(
            u32::try_from(offset).expect("source position overflowed u32"),
        ))
    }

    /// True if this position has been assigned.
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// The offset, if set.
    pub fn offset(&self) -> Option<usize> {
        self.0.map(|v| v as usize)
    }

    /// The `-1`-for-unset convention, as a plain integer.
    pub fn as_i64(&self) -> i64 {
        match self.0 {
            Some(offset) => i64::from(offset),
            None => -1,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// A node of the syntax tree: a name (tag), leaf text or children, optional
/// attributes, a source position, and a local error accumulator.
///
/// Names beginning with `:` or `_` are "anonymous": they are elided from
/// default serializations and are eligible for flattening by the
/// transformation engine's `flatten` transformer.
///
/// Structural equality is by `name` and content (recursively) only;
/// position, attributes, and local errors do not participate, per the tree
/// model's invariants.
#[derive(Debug, Clone)]
pub struct Node {
    name: Box<str>,
    content: Content,
    attr: Option<IndexMap<String, String>>,
    pos: Pos,
    errors: Vec<Error>,
}

impl Node {
    /// Build a leaf node: `name` with literal `text` content.
    pub fn leaf(name: impl Into<Box<str>>, text: impl Into<Box<str>>) -> Node {
        Node {
            name: name.into(),
            content: Content::Leaf(text.into()),
            attr: None,
            pos: Pos::UNSET,
            errors: Vec::new(),
        }
    }

    /// Build a branch node: `name` with the given, possibly empty, children.
    /// An empty child list is a legitimate empty match, not an error.
    pub fn branch(name: impl Into<Box<str>>, children: Vec<Node>) -> Node {
        Node {
            name: name.into(),
            content: Content::Branch(children),
            attr: None,
            pos: Pos::UNSET,
            errors: Vec::new(),
        }
    }

    /// The node's tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if this node's name marks it as anonymous (begins with `:` or
    /// `_`), elided from default serializations, eligible for flattening.
    pub fn is_anonymous(&self) -> bool {
        matches!(self.name.as_bytes().first(), Some(b':') | Some(b'_'))
    }

    /// True if this is a leaf (text) node.
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, Content::Leaf(_))
    }

    /// True if this is a branch node, regardless of whether it currently has
    /// any children.
    pub fn is_branch(&self) -> bool {
        matches!(self.content, Content::Branch(_))
    }

    /// This node's own leaf text, if it is a leaf. `None` for branch nodes,
    /// even empty ones.
    pub fn leaf_text(&self) -> Option<&str> {
        match &self.content {
            Content::Leaf(text) => Some(text),
            Content::Branch(_) => None,
        }
    }

    /// This node's children. Empty both for leaves and for branches with no
    /// children.
    pub fn children(&self) -> &[Node] {
        match &self.content {
            Content::Leaf(_) => &[],
            Content::Branch(children) => children,
        }
    }

    /// True if this node has no content: an empty branch, or a leaf with
    /// empty text.
    pub fn is_empty_match(&self) -> bool {
        match &self.content {
            Content::Leaf(text) => text.is_empty(),
            Content::Branch(children) => children.is_empty(),
        }
    }

    /// The concatenation of all leaf text in document order. For a node
    /// produced by a successful parse, this equals the slice of the source
    /// text spanning this node.
    pub fn to_text(&self) -> String {
        let mut buf = String::new();
        self.write_text(&mut buf);
        buf
    }

    fn write_text(&self, buf: &mut String) {
        match &self.content {
            Content::Leaf(text) => buf.push_str(text),
            Content::Branch(children) => {
                for child in children {
                    child.write_text(buf);
                }
            }
        }
    }

    /// The length, in bytes, of [`to_text`][Self::to_text]. Computed on
    /// demand; nodes don't cache a length since they can be mutated by the
    /// transformation engine.
    pub fn text_len(&self) -> usize {
        match &self.content {
            Content::Leaf(text) => text.len(),
            Content::Branch(children) => children.iter().map(Node::text_len).sum(),
        }
    }

    /// This node's source position, or [`Pos::UNSET`] if not yet assigned.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Assign this node's source position. Meant to be called only by the
    /// parser's lazy position-assignment pass (see `dhparser-parse`) once a
    /// parse completes; outside of that pass and the transformation engine,
    /// the tree should be treated as immutable.
    pub fn assign_pos(&mut self, pos: usize) {
        self.pos = Pos::at(pos);
    }

    /// This node's attributes, if any were set.
    pub fn attr(&self) -> Option<&IndexMap<String, String>> {
        self.attr.as_ref()
    }

    /// Set an attribute, creating the attribute map if this is the first
    /// one.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attr
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
    }

    /// This node's local error accumulator. Usually empty; most errors are
    /// recorded on the root via [`crate::RootNode::push_error`] instead.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Push a local error onto this node.
    pub fn push_error(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// Rename this node in place. Used by the transformation engine's
    /// `change_name` transformer.
    pub fn set_name(&mut self, name: impl Into<Box<str>>) {
        self.name = name.into();
    }

    /// Replace this node's content with the given leaf text. Used by the
    /// transformation engine's `collapse` and `replace_content_with`
    /// transformers.
    pub fn set_leaf_content(&mut self, text: impl Into<Box<str>>) {
        self.content = Content::Leaf(text.into());
    }

    /// Replace this node's children, keeping its name. Used by the
    /// transformation engine.
    pub fn set_children(&mut self, children: Vec<Node>) {
        self.content = Content::Branch(children);
    }

    /// Take this node's children, replacing them with an empty list, and
    /// return the old list. Used by transformers (`flatten`, `remove_*`)
    /// that need to rebuild the child list.
    pub fn take_children(&mut self) -> Vec<Node> {
        match &mut self.content {
            Content::Leaf(_) => Vec::new(),
            Content::Branch(children) => std::mem::take(children),
        }
    }

    /// Replace this whole node (name, content, attributes) with another's,
    /// keeping this node's position. Used by `replace_by_single_child`.
    pub fn replace_with(&mut self, mut other: Node) {
        let pos = self.pos;
        std::mem::swap(self, &mut other);
        self.pos = pos;
    }

    /// Yield all descendants (not including `self`) in pre-order, i.e. a
    /// node before its children, children left to right.
    pub fn descendants(&self) -> impl Iterator<Item = &Node> {
        self.children().iter().flat_map(Node::pre_order)
    }

    /// `self` followed by all of its descendants, pre-order.
    pub fn pre_order(&self) -> impl Iterator<Item = &Node> {
        PreOrder {
            stack: vec![self],
        }
    }

    /// All descendants (pre-order) satisfying `predicate`.
    pub fn find<'a>(&'a self, predicate: impl Fn(&Node) -> bool + 'a) -> Vec<&'a Node> {
        self.descendants().filter(|n| predicate(n)).collect()
    }

    /// The first descendant with the given name, or `None`.
    pub fn pick(&self, name: &str) -> Option<&Node> {
        self.descendants().find(|n| n.name() == name)
    }

    /// Descend by child names separated by `/`, returning the first node
    /// reached at each step. Returns `None` as soon as a segment can't be
    /// found among the current node's immediate children.
    pub fn navigate(&self, path: &str) -> Option<&Node> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current.children().iter().find(|c| c.name() == segment)?;
        }
        Some(current)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.content == other.content
    }
}

impl Eq for Node {}

struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        // push children in reverse so the leftmost child pops first
        for child in node.children().iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Node {
        Node::branch(
            "expr",
            vec![
                Node::leaf("number", "5"),
                Node::leaf(":plus", "+"),
                Node::branch(
                    "term",
                    vec![Node::leaf("number", "3"), Node::leaf("_ws", "  ")],
                ),
            ],
        )
    }

    #[test]
    fn leaf_and_branch_are_mutually_exclusive() {
        let leaf = Node::leaf("n", "5");
        assert!(leaf.is_leaf());
        assert!(!leaf.is_branch());

        let branch = Node::branch("n", vec![]);
        assert!(branch.is_branch());
        assert!(!branch.is_leaf());
    }

    #[test]
    fn to_text_concatenates_leaves_in_document_order() {
        let tree = sample_tree();
        assert_eq!(tree.to_text(), "5+3  ");
    }

    #[test]
    fn anonymous_names_are_detected() {
        assert!(Node::leaf(":x", "").is_anonymous());
        assert!(Node::leaf("_x", "").is_anonymous());
        assert!(!Node::leaf("x", "").is_anonymous());
    }

    #[test]
    fn find_collects_matching_descendants_preorder() {
        let tree = sample_tree();
        let numbers = tree.find(|n| n.name() == "number");
        assert_eq!(numbers.len(), 2);
        assert_eq!(numbers[0].leaf_text(), Some("5"));
        assert_eq!(numbers[1].leaf_text(), Some("3"));
    }

    #[test]
    fn pick_finds_first_match() {
        let tree = sample_tree();
        let found = tree.pick("number").expect("should find a number");
        assert_eq!(found.leaf_text(), Some("5"));
    }

    #[test]
    fn navigate_descends_by_child_names() {
        let tree = sample_tree();
        let found = tree.navigate("term/number").expect("should navigate");
        assert_eq!(found.leaf_text(), Some("3"));
    }

    #[test]
    fn navigate_fails_on_missing_segment() {
        let tree = sample_tree();
        assert!(tree.navigate("term/missing").is_none());
    }

    #[test]
    fn structural_equality_ignores_pos_and_attr() {
        let mut a = Node::leaf("x", "hi");
        let mut b = Node::leaf("x", "hi");
        a.assign_pos(5);
        b.set_attr("k", "v");
        assert_eq!(a, b);
    }

    #[test]
    fn pos_unset_reports_negative_one() {
        assert_eq!(Pos::UNSET.as_i64(), -1);
        assert_eq!(Pos::at(42).as_i64(), 42);
    }
}
