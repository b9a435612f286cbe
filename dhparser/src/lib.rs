/*!
The facade crate: wires [`dhparser_stringview`], [`dhparser_syntax`],
[`dhparser_parse`], and [`dhparser_transform`] together behind one entry
point, [`parse`], and owns the friendlier public name for the explicit
configuration value type that the lower crates pass around
([`ParserConfig`]).

Nothing in this crate has its own algorithm: every operation here is a thin
wrapper that picks a [`dhparser_parse::Grammar`] entry point, or loads a
[`ParserConfig`] from TOML the way a driver program (`dhparser-test`'s demo
binary) wants to, rather than hand-rolling a parser of its own.
*/

#![deny(missing_docs)]

mod config;
mod observer;

pub use config::{load_config, ConfigError, ParserConfig};
pub use observer::TracingHistoryObserver;

pub use dhparser_parse::{
    sane_parser_name, BuildError, Grammar, GrammarBuilder, HistoryEntry, HistoryObserver,
    InMemoryHistory, NullHistory, ParserId, ParserKind, Stage, Status,
};
pub use dhparser_syntax::{
    to_compact, to_sexpr, to_xml, Error, ErrorLevel, Node, RootNode, MANDATORY_CONTINUATION,
    MANDATORY_CONTINUATION_AT_EOF, PARSER_STOPPED_BEFORE_END, RESUME_NOTICE, RULE_RESUME_ERROR,
    TRANSFORM_ASSERT_CONTENT_FAILED, TRANSFORM_FORBIDDEN_TAG,
};
pub use dhparser_transform::{
    assert_content, change_name, collapse, flatten, flatten_matching, forbid, lean_left,
    reduce_single_child, remove_children_if, remove_empty, remove_tokens, remove_whitespace,
    replace_by_single_child, replace_content_with, TableKey, TransformContext, TransformTable,
    Transformer,
};

/// Commonly-needed names from all four lower crates, for a single
/// `use dhparser::prelude::*;`.
pub mod prelude {
    pub use crate::{
        parse, ConfigError, Grammar, GrammarBuilder, Node, ParserConfig, ParserKind, RootNode,
        Start, StartError, TableKey, TransformTable,
    };
    pub use dhparser_stringview::StringView;
}

/// Where a parse begins: the grammar's designated root, or an explicitly
/// named rule, useful for exercising one rule in isolation, e.g. from a
/// test or a REPL.
#[derive(Debug, Clone, Copy)]
pub enum Start<'a> {
    /// Begin at [`Grammar::root`].
    Root,
    /// Begin at the rule registered under this name.
    Named(&'a str),
}

/// `start` named a rule the grammar does not have.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("grammar has no rule named {0:?}")]
pub struct StartError(pub String);

/// Parse `text` against `grammar`, beginning at `start`, with `config`
/// governing left-recursion depth, history tracking, and recovery
/// notices. When `complete_match` is true (the usual case) a parser that
/// stops before the end of `text` records a
/// [`dhparser_syntax::PARSER_STOPPED_BEFORE_END`] error rather than
/// silently accepting a prefix match.
///
/// This is the single entry point `dhparser-test`'s demo binary and
/// end-to-end tests drive; everything it does is already implemented on
/// [`Grammar`], so it only has to resolve `start` and pick
/// [`Grammar::parse_observed`] vs. a bare discard history.
pub fn parse(
    grammar: &Grammar,
    text: &str,
    start: Start<'_>,
    config: &ParserConfig,
    complete_match: bool,
) -> Result<RootNode, StartError> {
    let start_id = match start {
        Start::Root => grammar.root(),
        Start::Named(name) => grammar
            .rule(name)
            .ok_or_else(|| StartError(name.to_string()))?,
    };

    let mut history = TracingHistoryObserver;
    Ok(grammar.parse_observed(text, start_id, config.clone(), complete_match, &mut history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhparser_parse::ParserKind;

    fn digit_grammar() -> Grammar {
        let mut builder = GrammarBuilder::new();
        let digits = builder.add(ParserKind::RegExp(regex::Regex::new(r"\d+").unwrap()));
        let root = builder.add_named("digits", ParserKind::Synonym(digits)).unwrap();
        builder.build(root).unwrap()
    }

    #[test]
    fn parse_from_root_consumes_whole_input() {
        let grammar = digit_grammar();
        let root = parse(&grammar, "123", Start::Root, &ParserConfig::default(), true).unwrap();
        assert!(!root.has_errors());
        assert_eq!(root.to_text(), "123");
    }

    #[test]
    fn parse_from_named_rule_resolves_by_name() {
        let grammar = digit_grammar();
        let root = parse(&grammar, "42", Start::Named("digits"), &ParserConfig::default(), true)
            .unwrap();
        assert!(!root.has_errors());
        assert_eq!(root.to_text(), "42");
    }

    #[test]
    fn parse_from_unknown_named_rule_is_an_error() {
        let grammar = digit_grammar();
        let err = parse(&grammar, "42", Start::Named("nope"), &ParserConfig::default(), true)
            .unwrap_err();
        assert_eq!(err, StartError("nope".to_string()));
    }
}
