/*!
Tree serializers. Three formats, each a free function over a
[`crate::RootNode`] (so tag-name-set lookups, `empty_tags`, `inline_tags`,
`string_tags`, are available during the walk): S-expression, XML, and a
compact indented form.
*/

mod compact;
mod sexpr;
mod xml;

pub use compact::to_compact;
pub use sexpr::to_sexpr;
pub use xml::to_xml;
