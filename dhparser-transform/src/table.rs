/*!
[`TransformTable`]: the map from a tag name (or one of the three special
keys) to the list of [`Transformer`]s applied there, plus the depth-first
walk that drives them. [`TableKey`] and the comma-expansion in
[`TransformTable::from_entries`] normalize comma-separated string keys into
single-tag entries once, at construction time, rather than re-splitting on
every lookup.
*/

use std::collections::HashMap;
use std::sync::Arc;

use dhparser_syntax::{Error, Node, RootNode};

use crate::context::TransformContext;

/// A function that inspects and may mutate one node, given the names of
/// its ancestors. Table entries are lists of these, applied in order.
/// `Arc`-wrapped (not boxed) so a single `TransformTable` can be cheaply
/// cloned and shared across the threads that each own one parse.
pub type Transformer = Arc<dyn Fn(&mut Node, &mut TransformContext) + Send + Sync>;

/// A key in a [`TransformTable`]: either a concrete tag name, or one of
/// three special keys: `"<"` (pre-order, runs on every node before its
/// children are visited), `">"`
/// (post-order, runs on every node after its own name-keyed transformers),
/// and `"*"` (the fallback used for any node whose tag has no entry of
/// its own).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableKey {
    /// A concrete tag name.
    Name(Box<str>),
    /// `"<"`, runs before descending into children, for every node.
    PreOrder,
    /// `">"`, runs after the node's own (or wildcard) transformers, for
    /// every node.
    PostOrder,
    /// `"*"`, the fallback for any node whose tag has no entry.
    Wildcard,
}

impl TableKey {
    fn parse_one(raw: &str) -> TableKey {
        match raw.trim() {
            "<" => TableKey::PreOrder,
            ">" => TableKey::PostOrder,
            "*" => TableKey::Wildcard,
            name => TableKey::Name(name.into()),
        }
    }
}

impl From<&str> for TableKey {
    fn from(raw: &str) -> TableKey {
        TableKey::parse_one(raw)
    }
}

/// A read-only, `Send + Sync` transformation table: built once (typically
/// alongside the [`dhparser_parse::Grammar`] it is paired with) and
/// shared across every parse that needs it.
#[derive(Default)]
pub struct TransformTable {
    entries: HashMap<TableKey, Vec<Transformer>>,
}

impl TransformTable {
    /// An empty table; every node passes through unchanged.
    pub fn new() -> Self {
        TransformTable::default()
    }

    /// Register `transformers` under a single key.
    pub fn insert(&mut self, key: TableKey, transformers: Vec<Transformer>) {
        self.entries.entry(key).or_default().extend(transformers);
    }

    /// Build a table from `(key, transformers)` pairs where `key` may be a
    /// comma-separated list of tag names (or special keys), expanding each
    /// comma-separated key into one entry per name, a convenience over the
    /// normalized, single-tag internal representation.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Transformer>)>,
        S: AsRef<str>,
    {
        let mut table = TransformTable::new();
        for (raw_key, transformers) in entries {
            for part in raw_key.as_ref().split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                table.insert(TableKey::parse_one(part), transformers.clone());
            }
        }
        table
    }

    fn lookup(&self, key: &TableKey) -> &[Transformer] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Run the table over `root`'s tree, depth-first post-order, and fold
    /// any validation errors recorded by `forbid`/`assert_content` into
    /// the tree's error list.
    pub fn apply(&self, root: &mut RootNode) {
        let mut ancestors = Vec::new();
        let mut errors = Vec::new();
        self.visit(root.root_mut(), &mut ancestors, &mut errors);
        root.extend_errors(errors);
    }

    fn visit(&self, node: &mut Node, ancestors: &mut Vec<Box<str>>, errors: &mut Vec<Error>) {
        for t in self.lookup(&TableKey::PreOrder) {
            let mut ctx = TransformContext::new(ancestors, errors);
            t(node, &mut ctx);
        }

        ancestors.push(node.name().into());
        if node.is_branch() {
            let mut children = node.take_children();
            for child in children.iter_mut() {
                self.visit(child, ancestors, errors);
            }
            node.set_children(children);
        }
        ancestors.pop();

        let named = self.lookup(&TableKey::Name(node.name().into()));
        let main = if named.is_empty() {
            self.lookup(&TableKey::Wildcard)
        } else {
            named
        };
        for t in main {
            let mut ctx = TransformContext::new(ancestors, errors);
            t(node, &mut ctx);
        }

        for t in self.lookup(&TableKey::PostOrder) {
            let mut ctx = TransformContext::new(ancestors, errors);
            t(node, &mut ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::change_name;

    #[test]
    fn from_entries_expands_comma_separated_keys() {
        let table = TransformTable::from_entries([("foo, bar", vec![change_name("baz")])]);
        assert_eq!(table.lookup(&TableKey::Name("foo".into())).len(), 1);
        assert_eq!(table.lookup(&TableKey::Name("bar".into())).len(), 1);
    }

    #[test]
    fn wildcard_falls_back_for_unlisted_tags() {
        let table = TransformTable::from_entries([("*", vec![change_name("renamed")])]);
        let mut root = RootNode::new(Node::leaf("anything", "x"), "x");
        table.apply(&mut root);
        assert_eq!(root.name(), "renamed");
    }

    #[test]
    fn named_entry_takes_precedence_over_wildcard() {
        let table = TransformTable::from_entries([
            ("thing", vec![change_name("specific")]),
            ("*", vec![change_name("generic")]),
        ]);
        let mut root = RootNode::new(Node::leaf("thing", "x"), "x");
        table.apply(&mut root);
        assert_eq!(root.name(), "specific");
    }
}
