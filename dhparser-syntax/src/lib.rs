/*!
The concrete/abstract syntax-tree data model: [`Node`], [`RootNode`],
[`Error`], and the three tree serializations (S-expression, XML, compact
indented). This crate is the leaf-most of the three tree-facing crates;
it owns the data, not how it gets built (`dhparser-parse`) or rewritten
(`dhparser-transform`).
*/

#![deny(missing_docs)]

mod error;
mod node;
mod root;
mod serialize;

pub use error::{
    Error, ErrorLevel, MANDATORY_CONTINUATION, MANDATORY_CONTINUATION_AT_EOF,
    PARSER_STOPPED_BEFORE_END, RESUME_NOTICE, RULE_RESUME_ERROR, TRANSFORM_ASSERT_CONTENT_FAILED,
    TRANSFORM_FORBIDDEN_TAG,
};
pub use node::{Node, Pos};
pub use root::RootNode;
pub use serialize::{to_compact, to_sexpr, to_xml};
