/*!
Compact indented serialization: a tag header per node, its leaf content (if
any) on the same line, children as further indented lines below.
*/

use crate::node::Node;
use crate::root::RootNode;

/// Render `root` as a compact indented tree, two spaces per level.
pub fn to_compact(root: &RootNode) -> String {
    let mut out = String::new();
    write_node(root.root(), 0, &mut out);
    // drop the trailing newline introduced by the last `writeln`-style push
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

fn write_node(node: &Node, depth: usize, out: &mut String) {
    indent(depth, out);
    out.push_str(node.name());

    match node.leaf_text() {
        Some(text) if !text.is_empty() => {
            out.push_str(": ");
            out.push_str(text);
            out.push('\n');
        }
        Some(_) => out.push('\n'),
        None => {
            out.push('\n');
            for child in node.children() {
                write_node(child, depth + 1, out);
            }
        }
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_is_a_single_line() {
        let root = RootNode::new(Node::leaf("number", "5"), "5");
        assert_eq!(to_compact(&root), "number: 5");
    }

    #[test]
    fn branch_indents_children_one_level() {
        let tree = Node::branch("expr", vec![Node::leaf("a", "1"), Node::leaf("b", "2")]);
        let root = RootNode::new(tree, "");
        assert_eq!(to_compact(&root), "expr\n  a: 1\n  b: 2");
    }

    #[test]
    fn nested_branches_indent_further() {
        let tree = Node::branch(
            "expr",
            vec![Node::branch("term", vec![Node::leaf("number", "3")])],
        );
        let root = RootNode::new(tree, "");
        assert_eq!(to_compact(&root), "expr\n  term\n    number: 3");
    }

    #[test]
    fn empty_leaf_has_no_colon() {
        let root = RootNode::new(Node::leaf("eof", ""), "");
        assert_eq!(to_compact(&root), "eof");
    }
}
