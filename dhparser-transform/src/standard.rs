/*!
The standard transformer library. Each is a free
function returning a [`crate::Transformer`] closure, mirroring the
`Counterpart`/combinator-as-value idiom `dhparser-parse`'s `ParserKind`
already uses for its own function-valued fields
(`dhparser_parse::Counterpart`); a transformer is just another piece of
grammar-adjacent behavior that is more convenient as data than as a trait
impl, since a table is built once and shared read-only across threads.
*/

use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;

use dhparser_syntax::{Error, Node};

use crate::table::Transformer;

/// If the node has exactly one child, replace the node itself (name and
/// content) with that child. A no-op on any other node, including leaves
/// and nodes with zero or more-than-one children.
pub fn replace_by_single_child() -> Transformer {
    Arc::new(|node, _ctx| {
        if node.children().len() == 1 {
            let child = node.take_children().pop().expect("checked len == 1");
            node.replace_with(child);
        }
    })
}

/// If the node has exactly one child, adopt that child's content (leaf
/// text or children) but keep this node's own name.
pub fn reduce_single_child() -> Transformer {
    Arc::new(|node, _ctx| {
        if node.children().len() == 1 {
            let mut child = node.take_children().pop().expect("checked len == 1");
            if let Some(text) = child.leaf_text() {
                node.set_leaf_content(text.to_string());
            } else {
                node.set_children(child.take_children());
            }
        }
    })
}

/// Inline any child matched by `predicate` into this node's own child
/// list, replacing that child with its own children. Defaults to
/// `Node::is_anonymous` when no predicate is given via
/// [`flatten_matching`]. Applying `flatten` twice is idempotent: once a
/// matched child has been inlined, its former children are now this
/// node's direct children and are no longer themselves matched-and-nested
/// beneath a matched node.
pub fn flatten() -> Transformer {
    flatten_matching(Node::is_anonymous)
}

fn flatten_into(mut child: Node, predicate: &dyn Fn(&Node) -> bool, out: &mut Vec<Node>) {
    if predicate(&child) && child.is_branch() {
        for grandchild in child.take_children() {
            flatten_into(grandchild, predicate, out);
        }
    } else {
        out.push(child);
    }
}

/// Like [`flatten`], but inlining children matched by `predicate` instead
/// of the default "is anonymous". Inlines recursively to a fixed point in
/// a single application (a nested chain of matched branches collapses all
/// at once), which is what makes applying `flatten` a second time a
/// no-op.
pub fn flatten_matching(predicate: impl Fn(&Node) -> bool + Send + Sync + 'static) -> Transformer {
    Arc::new(move |node, _ctx| {
        if !node.is_branch() {
            return;
        }
        let children = node.take_children();
        let mut flattened = Vec::with_capacity(children.len());
        for child in children {
            flatten_into(child, &predicate, &mut flattened);
        }
        node.set_children(flattened);
    })
}

/// Drop children that are an empty match (empty leaf text or no
/// children).
pub fn remove_empty() -> Transformer {
    remove_children_if(Node::is_empty_match)
}

/// Drop children tagged `:whitespace`, the tag every
/// `dhparser_parse::ParserKind::Whitespace` match carries, regardless of
/// the enclosing rule's name.
pub fn remove_whitespace() -> Transformer {
    remove_children_if(|child| child.name() == ":whitespace")
}

/// Drop children that are anonymous leaves whose text is in `tokens`.
pub fn remove_tokens(tokens: impl IntoIterator<Item = impl Into<String>>) -> Transformer {
    let tokens: HashSet<String> = tokens.into_iter().map(Into::into).collect();
    remove_children_if(move |child| {
        child.is_anonymous() && child.leaf_text().is_some_and(|text| tokens.contains(text))
    })
}

/// Drop any child matching `predicate`.
pub fn remove_children_if(predicate: impl Fn(&Node) -> bool + Send + Sync + 'static) -> Transformer {
    Arc::new(move |node, _ctx| {
        if !node.is_branch() {
            return;
        }
        let children = node.take_children();
        node.set_children(children.into_iter().filter(|c| !predicate(c)).collect());
    })
}

/// Replace a branch node's children with a single leaf carrying their
/// concatenated text. A no-op if the node is already a leaf (so `collapse`
/// applied to an already-collapsed node does nothing further).
pub fn collapse() -> Transformer {
    Arc::new(|node, _ctx| {
        if node.is_branch() {
            let text = node.to_text();
            node.set_leaf_content(text);
        }
    })
}

/// Rename the node.
pub fn change_name(new_name: impl Into<String>) -> Transformer {
    let new_name = new_name.into();
    Arc::new(move |node, _ctx| node.set_name(new_name.clone()))
}

/// Replace the node's result (whatever it was) with a fixed leaf text.
pub fn replace_content_with(text: impl Into<String>) -> Transformer {
    let text = text.into();
    Arc::new(move |node, _ctx| node.set_leaf_content(text.clone()))
}

/// Record a [`dhparser_syntax::TRANSFORM_FORBIDDEN_TAG`] error if the
/// node's tag is one of `tags`. Validation only, never mutates the node.
pub fn forbid(tags: impl IntoIterator<Item = impl Into<String>>) -> Transformer {
    let tags: HashSet<String> = tags.into_iter().map(Into::into).collect();
    Arc::new(move |node, ctx| {
        if tags.contains(node.name()) {
            let pos = node.pos().offset().unwrap_or(0);
            ctx.push_error(Error::error(
                format!("tag '{}' is forbidden in this context", node.name()),
                dhparser_syntax::TRANSFORM_FORBIDDEN_TAG,
                pos,
            ));
        }
    })
}

/// Record a [`dhparser_syntax::TRANSFORM_ASSERT_CONTENT_FAILED`] error if
/// the node's text does not match `pattern`. Validation only, never
/// mutates the node.
pub fn assert_content(pattern: Regex) -> Transformer {
    Arc::new(move |node, ctx| {
        let text = node.to_text();
        if !pattern.is_match(&text) {
            let pos = node.pos().offset().unwrap_or(0);
            ctx.push_error(Error::error(
                format!("content {text:?} does not match /{pattern}/"),
                dhparser_syntax::TRANSFORM_ASSERT_CONTENT_FAILED,
                pos,
            ));
        }
    })
}

fn unroll_right(
    mut node: Node,
    tags: &[Box<str>],
    operands: &mut Vec<Node>,
    operators: &mut Vec<Node>,
) {
    let is_chain_node = tags.iter().any(|t| &**t == node.name()) && node.children().len() == 3;
    if !is_chain_node {
        operands.push(node);
        return;
    }
    let mut children = node.take_children();
    let right = children.pop().expect("checked len == 3");
    let op = children.pop().expect("checked len == 3");
    let left = children.pop().expect("checked len == 3");
    operands.push(left);
    operators.push(op);
    unroll_right(right, tags, operands, operators);
}

/// Rotate a right-recursive binary-operator chain into left-associative
/// form: a node tagged with one of `tags`, shaped as
/// `(operand, operator, tail)` where `tail` is recursively another node
/// of the same shape, is rebuilt as a left-leaning nest of the same
/// three-child shape. Any node not matching that exact shape is left
/// untouched.
///
/// Walks the whole chain itself in one call rather than relying on
/// repeated per-node applications, so register it under
/// [`crate::TableKey::PreOrder`] (`"<"`): applied pre-order, it sees the
/// original right-recursive chain intact before any of its same-tagged
/// descendants have been visited. Registered post-order (by name) it
/// would instead see each descendant already independently rotated by
/// the time its ancestor runs, which produces a tree that is
/// left-leaning in pieces but not overall. Applying it to an
/// already-rotated node is a no-op, so running it again during the
/// table's own post-order descent into the freshly rebuilt children costs
/// nothing.
pub fn lean_left(tags: impl IntoIterator<Item = impl Into<Box<str>>>) -> Transformer {
    let tags: Vec<Box<str>> = tags.into_iter().map(Into::into).collect();
    Arc::new(move |node, _ctx| {
        if !tags.iter().any(|t| &**t == node.name()) || node.children().len() != 3 {
            return;
        }
        let name = node.name().to_string();
        let taken = std::mem::replace(node, Node::leaf(":lean_left_tmp", ""));

        let mut operands = Vec::new();
        let mut operators = Vec::new();
        unroll_right(taken, &tags, &mut operands, &mut operators);

        let mut operands = operands.into_iter();
        let mut acc = operands.next().expect("unroll always yields at least one operand");
        for op in operators {
            let rhs = operands
                .next()
                .expect("unroll yields one more operand than operator");
            acc = Node::branch(name.clone(), vec![acc, op, rhs]);
        }
        *node = acc;
    })
}

#[cfg(test)]
mod tests {
    use dhparser_syntax::RootNode;

    use super::*;
    use crate::table::{TableKey, TransformTable};

    fn apply_one(key: &str, transformer: Transformer, root: Node) -> RootNode {
        let mut table = TransformTable::new();
        table.insert(TableKey::Name(key.into()), vec![transformer]);
        let text = root.to_text();
        let mut root = RootNode::new(root, text);
        table.apply(&mut root);
        root
    }

    #[test]
    fn replace_by_single_child_is_noop_on_multi_child_node() {
        let node = Node::branch("n", vec![Node::leaf("a", "1"), Node::leaf("b", "2")]);
        let root = apply_one("n", replace_by_single_child(), node);
        assert_eq!(root.name(), "n");
        assert_eq!(root.children().len(), 2);
    }

    #[test]
    fn replace_by_single_child_adopts_the_only_child() {
        let node = Node::branch("n", vec![Node::leaf("a", "1")]);
        let root = apply_one("n", replace_by_single_child(), node);
        assert_eq!(root.name(), "a");
        assert_eq!(root.leaf_text(), Some("1"));
    }

    #[test]
    fn flatten_is_idempotent_across_nested_anonymous_branches() {
        let node = Node::branch(
            "n",
            vec![
                Node::leaf("keep", "x"),
                Node::branch(
                    ":a",
                    vec![Node::branch(":b", vec![Node::leaf("keep", "y")]), Node::leaf("keep", "z")],
                ),
            ],
        );
        let once = apply_one("n", flatten(), node);
        let names: Vec<_> = once.children().iter().map(Node::name).collect();
        assert_eq!(names, vec!["keep", "keep", "keep"]);

        let twice_input = once.root().clone();
        let twice = apply_one("n", flatten(), twice_input);
        assert_eq!(twice.root(), once.root());
    }

    #[test]
    fn collapse_is_idempotent() {
        let node = Node::branch("n", vec![Node::leaf("a", "he"), Node::leaf("b", "llo")]);
        let once = apply_one("n", collapse(), node);
        assert_eq!(once.leaf_text(), Some("hello"));

        let twice = apply_one("n", collapse(), once.root().clone());
        assert_eq!(twice.root(), once.root());
    }

    #[test]
    fn remove_whitespace_drops_whitespace_tagged_children_only() {
        let node = Node::branch(
            "n",
            vec![
                Node::leaf("word", "hi"),
                Node::leaf(":whitespace", "  "),
                Node::leaf("word", "there"),
            ],
        );
        let root = apply_one("n", remove_whitespace(), node);
        assert_eq!(root.children().len(), 2);
    }

    #[test]
    fn remove_tokens_drops_matching_anonymous_leaves() {
        let node = Node::branch(
            "n",
            vec![Node::leaf(":op", "+"), Node::leaf("number", "1"), Node::leaf(":op", "-")],
        );
        let root = apply_one("n", remove_tokens(["+", "-"]), node);
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].name(), "number");
    }

    #[test]
    fn lean_left_rotates_right_recursive_chain() {
        // expr(1, "+", expr(2, "+", expr(3, "+", 4)))  ->  left-leaning nest.
        let innermost = Node::branch(
            "expr",
            vec![Node::leaf("num", "3"), Node::leaf(":plus", "+"), Node::leaf("num", "4")],
        );
        let middle = Node::branch(
            "expr",
            vec![Node::leaf("num", "2"), Node::leaf(":plus", "+"), innermost],
        );
        let outer = Node::branch(
            "expr",
            vec![Node::leaf("num", "1"), Node::leaf(":plus", "+"), middle],
        );

        let mut table = TransformTable::new();
        table.insert(TableKey::PreOrder, vec![lean_left(["expr"])]);
        let text = outer.to_text();
        let mut root = RootNode::new(outer, text);
        table.apply(&mut root);

        assert_eq!(root.to_text(), "1+2+3+4");
        // Left-leaning: the outermost node's first child is itself an
        // `expr`, its second child an operator, third a plain operand.
        assert_eq!(root.children()[0].name(), "expr");
        assert_eq!(root.children()[2].leaf_text(), Some("4"));
        // Fully left-associative all the way down: ((1+2)+3)+4.
        assert_eq!(root.children()[0].children()[0].name(), "expr");
        assert_eq!(
            root.children()[0].children()[0].children()[2].leaf_text(),
            Some("2")
        );
    }

    #[test]
    fn forbid_records_an_error_without_mutating() {
        let node = Node::leaf("banned", "x");
        let root = apply_one("banned", forbid(["banned"]), node);
        assert!(root.has_errors());
        assert_eq!(root.name(), "banned");
    }

    #[test]
    fn assert_content_records_an_error_on_mismatch() {
        let node = Node::leaf("n", "abc");
        let root = apply_one("n", assert_content(Regex::new(r"^[0-9]+$").unwrap()), node);
        assert!(root.has_errors());
    }

    #[test]
    fn assert_content_is_silent_on_match() {
        let node = Node::leaf("n", "123");
        let root = apply_one("n", assert_content(Regex::new(r"^[0-9]+$").unwrap()), node);
        assert!(!root.has_errors());
    }
}
