/*!
The transformation engine: a table-driven post-order visitor that rewrites
a concrete syntax tree into an abstract one by applying small
node-mutating [`Transformer`] functions keyed by tag name.
[`TransformTable`] is built once, from an ordinary `Vec` of
`(tag-or-special-key, transformers)` pairs or the comma-separated-key DSL
surface, and is `Send + Sync` so it can be shared across threads the way a
[`crate::TransformTable`] built for one grammar is reused across many
parses.
*/

#![deny(missing_docs)]

mod context;
mod standard;
mod table;

pub use context::TransformContext;
pub use standard::{
    assert_content, change_name, collapse, flatten, flatten_matching, forbid, lean_left,
    reduce_single_child, remove_children_if, remove_empty, remove_tokens, remove_whitespace,
    replace_by_single_child, replace_content_with,
};
pub use table::{TableKey, TransformTable, Transformer};
