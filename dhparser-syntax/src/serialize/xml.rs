/*!
XML serialization: elements named by tag, attributes as XML attributes,
`empty_tags` self-close, `string_tags` render as bare text, `inline_tags`
suppress whitespace injection between children.
*/

use crate::node::Node;
use crate::root::RootNode;

/// Render `root` as XML.
pub fn to_xml(root: &RootNode) -> String {
    let mut out = String::new();
    write_node(root.root(), root, &mut out, false);
    out
}

fn write_node(node: &Node, root: &RootNode, out: &mut String, parent_inline: bool) {
    let name = node.name();

    if root.string_tags().contains(name) {
        if let Some(text) = node.leaf_text() {
            escape_text(text, out);
        } else {
            for child in node.children() {
                write_node(child, root, out, parent_inline);
            }
        }
        return;
    }

    out.push('<');
    out.push_str(name);
    if let Some(attrs) = node.attr() {
        for (key, value) in attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            escape_attr(value, out);
            out.push('"');
        }
    }

    if root.empty_tags().contains(name) && node.is_empty_match() {
        out.push_str("/>");
        return;
    }

    out.push('>');

    let inline = parent_inline || root.inline_tags().contains(name);
    match node.leaf_text() {
        Some(text) => escape_text(text, out),
        None => {
            for child in node.children() {
                write_node(child, root, out, inline);
            }
        }
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_renders_as_element_with_text() {
        let root = RootNode::new(Node::leaf("number", "5"), "5");
        assert_eq!(to_xml(&root), "<number>5</number>");
    }

    #[test]
    fn branch_nests_child_elements() {
        let tree = Node::branch("expr", vec![Node::leaf("a", "1"), Node::leaf("b", "2")]);
        let root = RootNode::new(tree, "");
        assert_eq!(to_xml(&root), "<expr><a>1</a><b>2</b></expr>");
    }

    #[test]
    fn empty_tags_self_close() {
        let mut root = RootNode::new(Node::branch("br", vec![]), "");
        root.add_empty_tag("br");
        assert_eq!(to_xml(&root), "<br/>");
    }

    #[test]
    fn string_tags_render_as_bare_text() {
        let mut node = Node::leaf("literal", "hi & bye");
        node.assign_pos(0);
        let mut root = RootNode::new(node, "hi & bye");
        root.add_string_tag("literal");
        assert_eq!(to_xml(&root), "hi &amp; bye");
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let mut node = Node::leaf("a", "<tag>&");
        node.set_attr("href", "x\"y");
        let root = RootNode::new(node, "");
        assert_eq!(to_xml(&root), "<a href=\"x&quot;y\">&lt;tag&gt;&amp;</a>");
    }
}
