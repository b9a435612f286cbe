/*!
The parser-combinator engine: [`ParserKind`] (the combinator algebra),
[`GrammarBuilder`]/[`Grammar`] (explicit construction and the top-level
[`Grammar::parse`] entry point), [`Config`] (explicit, value-type parse
options), and the [`HistoryObserver`] trace hook. This crate owns *building*
and *running* parsers; the tree they produce is [`dhparser_syntax::Node`],
and rewriting that tree afterward is [`dhparser-transform`](../dhparser_transform).
*/

#![deny(missing_docs)]

mod config;
mod engine;
mod error;
mod grammar;
mod history;
mod kind;
mod position;
mod state;

pub use config::{Config, Stage};
pub use error::{sane_parser_name, BuildError};
pub use grammar::{Grammar, GrammarBuilder};
pub use history::{HistoryEntry, HistoryObserver, InMemoryHistory, NullHistory, Status, EXCERPT_LEN};
pub use kind::{Counterpart, ParserId, ParserKind, RepetitionBound};
pub use state::CaptureStackSnapshot;
