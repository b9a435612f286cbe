/*!
S-expression serialization: `(name content)` for a leaf, `(name child…)` for
a branch. String atoms are double-quoted with minimal escaping; anonymous
nodes (`:`/`_`-prefixed names) are rendered without a tag, just their
content.
*/

use crate::node::Node;
use crate::root::RootNode;

/// Render `root` as an S-expression.
pub fn to_sexpr(root: &RootNode) -> String {
    let mut out = String::new();
    write_node(root.root(), &mut out);
    out
}

fn write_node(node: &Node, out: &mut String) {
    if node.is_anonymous() {
        write_content(node, out);
        return;
    }

    out.push('(');
    out.push_str(node.name());
    if !node.is_empty_match() || node.is_leaf() {
        out.push(' ');
    }
    write_content(node, out);
    out.push(')');
}

fn write_content(node: &Node, out: &mut String) {
    match node.leaf_text() {
        Some(text) => write_quoted(text, out),
        None => {
            let children = node.children();
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_node(child, out);
            }
        }
    }
}

fn write_quoted(text: &str, out: &mut String) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_renders_as_quoted_atom() {
        let root = RootNode::new(Node::leaf("number", "5"), "5");
        assert_eq!(to_sexpr(&root), "(number \"5\")");
    }

    #[test]
    fn branch_renders_nested_parens() {
        let tree = Node::branch(
            "expr",
            vec![Node::leaf("number", "5"), Node::leaf("op", "+"), Node::leaf("number", "3")],
        );
        let root = RootNode::new(tree, "5+3");
        assert_eq!(to_sexpr(&root), "(expr (number \"5\") (op \"+\") (number \"3\"))");
    }

    #[test]
    fn anonymous_nodes_are_elided_from_the_tag_position() {
        let tree = Node::branch(
            "expr",
            vec![Node::leaf("number", "5"), Node::leaf(":plus", "+")],
        );
        let root = RootNode::new(tree, "5+");
        assert_eq!(to_sexpr(&root), "(expr (number \"5\") \"+\")");
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        let root = RootNode::new(Node::leaf("s", "a\"b\\c"), "");
        assert_eq!(to_sexpr(&root), "(s \"a\\\"b\\\\c\")");
    }

    #[test]
    fn empty_branch_has_no_trailing_space() {
        let root = RootNode::new(Node::branch("empty", vec![]), "");
        assert_eq!(to_sexpr(&root), "(empty)");
    }
}
