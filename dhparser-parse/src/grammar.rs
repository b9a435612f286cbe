/*!
[`Grammar`]: the container that owns the parser arena, wires every
[`ParserId`] to its definition, and exposes the top-level
[`Grammar::parse`] entry point. [`GrammarBuilder`] is an explicit
constructor: every rule is registered by an explicit call, forward
references are resolved explicitly, and the resulting `Grammar` is an
immutable, `Send + Sync` rule graph that can be shared across threads;
only the per-parse [`crate::ParseState`] is exclusive to one parse.
*/

use std::collections::HashMap;

use regex::Regex;

use dhparser_stringview::StringView;
use dhparser_syntax::{Error, Node, RootNode};

use crate::error::{sane_parser_name, BuildError};
use crate::history::{HistoryObserver, NullHistory};
use crate::kind::{ParserId, ParserKind};
use crate::state::ParseState;
use crate::Config;

/// Everything the grammar keeps about one registered parser beyond its
/// combinator shape: the rule name it is bound to (if any), and the
/// per-rule recovery directives attached to that name.
pub(crate) struct ParserEntry {
    pub(crate) kind: ParserKind,
    pub(crate) name: Option<Box<str>>,
    pub(crate) skip_rules: Vec<Regex>,
    pub(crate) resume_rules: Vec<Regex>,
    pub(crate) error_template: Option<String>,
}

/// The parser graph, reachable from a designated root, plus the recovery
/// directives attached to each named rule. Immutable once built; safe to
/// share (e.g. via `Arc`) across threads, since all per-parse mutable state
/// lives in [`ParseState`] instead.
pub struct Grammar {
    pub(crate) parsers: Vec<ParserEntry>,
    root: ParserId,
    names: HashMap<Box<str>, ParserId>,
}

impl Grammar {
    pub(crate) fn entry(&self, id: ParserId) -> &ParserEntry {
        &self.parsers[id.index()]
    }

    /// The grammar's designated root parser.
    pub fn root(&self) -> ParserId {
        self.root
    }

    /// The rule name bound to `id`, if any.
    pub fn parser_name(&self, id: ParserId) -> Option<&str> {
        self.entry(id).name.as_deref()
    }

    /// Look up a named rule's id; parsing need not begin at the grammar's
    /// root, so a caller can start from any registered rule by name.
    pub fn rule(&self, name: &str) -> Option<ParserId> {
        self.names.get(name).copied()
    }

    /// Parse `text` from the grammar's root, with default [`Config`],
    /// requiring the entire input to be consumed.
    pub fn parse(&self, text: &str) -> RootNode {
        self.parse_with(text, Config::default())
    }

    /// Parse `text` from the grammar's root with an explicit [`Config`],
    /// requiring the entire input to be consumed.
    pub fn parse_with(&self, text: &str, config: Config) -> RootNode {
        self.parse_from(text, self.root, config, true)
    }

    /// The full entry point: parse `text` starting from `start` (which need
    /// not be the grammar's root, useful for testing a sub-rule in
    /// isolation), with an explicit [`Config`], accepting a prefix match
    /// when `complete_match` is false.
    pub fn parse_from(
        &self,
        text: &str,
        start: ParserId,
        config: Config,
        complete_match: bool,
    ) -> RootNode {
        let mut discard = NullHistory;
        self.parse_observed(text, start, config, complete_match, &mut discard)
    }

    /// Like [`Grammar::parse_from`], but recording every parser invocation
    /// to `observer` when `config.history_tracking` is set.
    pub fn parse_observed(
        &self,
        text: &str,
        start: ParserId,
        config: Config,
        complete_match: bool,
        observer: &mut dyn HistoryObserver,
    ) -> RootNode {
        let mut state = ParseState::new(config, observer);
        let view = StringView::new(text);

        let (node, end) = crate::engine::run(self, &mut state, start, view, 0);

        let mut root_content = node.unwrap_or_else(|| Node::branch(":no_match", Vec::new()));

        if complete_match && end < text.len() {
            let excerpt_len = text[end..].char_indices().nth(40).map(|(i, _)| i).unwrap_or(text.len() - end);
            let excerpt = &text[end..end + excerpt_len];
            state.push_error(Error::error(
                format!("Parser stopped before end of input: {excerpt:?}"),
                dhparser_syntax::PARSER_STOPPED_BEFORE_END,
                end,
            ));
            let remainder = Node::leaf(":unparsed", &text[end..]);
            root_content = match root_content.is_branch() {
                true => {
                    let mut children = root_content.take_children();
                    children.push(remainder);
                    Node::branch(root_content.name().to_string(), children)
                }
                false => Node::branch(":series", vec![root_content, remainder]),
            };
        }

        crate::position::assign_positions(&mut root_content, 0);

        let mut root = RootNode::new(root_content, text);
        root.set_variable_stacks(state.capture_snapshot());
        root.extend_errors(state.take_errors());

        if state.config.log_syntax_trees.contains(&crate::config::Stage::Cst) {
            tracing::debug!(tree = %dhparser_syntax::to_sexpr(&root), "CST produced");
        }

        root
    }
}

/// The explicit builder for a [`Grammar`]. Every rule is registered by calling
/// [`GrammarBuilder::add_named`] (or the anonymous [`GrammarBuilder::add`]
/// for helper sub-parsers); `Forward` placeholders created by
/// [`GrammarBuilder::forward`] must be resolved with
/// [`GrammarBuilder::resolve_forward`] before [`GrammarBuilder::build`]
/// succeeds.
#[derive(Default)]
pub struct GrammarBuilder {
    parsers: Vec<ParserEntry>,
    names: HashMap<String, ParserId>,
}

impl GrammarBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        GrammarBuilder::default()
    }

    /// Register an anonymous parser (no rule name), returning its id.
    pub fn add(&mut self, kind: ParserKind) -> ParserId {
        let id = ParserId(self.parsers.len() as u32);
        self.parsers.push(ParserEntry {
            kind,
            name: None,
            skip_rules: Vec::new(),
            resume_rules: Vec::new(),
            error_template: None,
        });
        id
    }

    /// Register a parser bound to a rule name. Fails if the name is
    /// reserved (empty, or starts/ends with `__`) or already registered.
    pub fn add_named(
        &mut self,
        name: impl Into<String>,
        kind: ParserKind,
    ) -> Result<ParserId, BuildError> {
        let name = name.into();
        if !sane_parser_name(&name) {
            return Err(BuildError::InvalidName(name));
        }
        if self.names.contains_key(&name) {
            return Err(BuildError::DuplicateName(name));
        }
        let id = self.add(kind);
        self.parsers[id.index()].name = Some(name.clone().into_boxed_str());
        self.names.insert(name, id);
        Ok(id)
    }

    /// Create an unresolved `Forward` placeholder, for parsers that need to
    /// reference themselves or a rule defined later.
    pub fn forward(&mut self) -> ParserId {
        self.add(ParserKind::Forward(None))
    }

    /// Point a `Forward` placeholder at its real target. `forward` must
    /// have been created by [`GrammarBuilder::forward`].
    pub fn resolve_forward(&mut self, forward: ParserId, target: ParserId) {
        if let ParserKind::Forward(slot) = &mut self.parsers[forward.index()].kind {
            *slot = Some(target);
        }
    }

    /// Attach `@name_skip` regexes to the rule registered under `id`.
    pub fn set_skip_rules(&mut self, id: ParserId, rules: Vec<Regex>) {
        self.parsers[id.index()].skip_rules = rules;
    }

    /// Attach `@name_resume` regexes to the rule registered under `id`.
    pub fn set_resume_rules(&mut self, id: ParserId, rules: Vec<Regex>) {
        self.parsers[id.index()].resume_rules = rules;
    }

    /// Attach a custom error-message template to the rule registered under
    /// `id`.
    pub fn set_error_template(&mut self, id: ParserId, template: impl Into<String>) {
        self.parsers[id.index()].error_template = Some(template.into());
    }

    /// Look up a previously registered rule by name.
    pub fn lookup(&self, name: &str) -> Option<ParserId> {
        self.names.get(name).copied()
    }

    /// Finalize the grammar, rooted at `root`. Validates that every
    /// `Forward` was resolved, that `root` belongs to this builder, and
    /// that no `Alternative` has a direct `Option`/`ZeroOrMore`-shaped
    /// child that would make later branches unreachable.
    pub fn build(self, root: ParserId) -> Result<Grammar, BuildError> {
        if root.index() >= self.parsers.len() {
            return Err(BuildError::UnknownRoot(root));
        }

        for (i, entry) in self.parsers.iter().enumerate() {
            if let ParserKind::Forward(None) = entry.kind {
                return Err(BuildError::UnresolvedForward(ParserId(i as u32)));
            }
            if let ParserKind::Alternative(children) = &entry.kind {
                for &child in children {
                    if matches!(
                        self.parsers[child.index()].kind,
                        ParserKind::Option_(_) | ParserKind::ZeroOrMore(_)
                    ) {
                        return Err(BuildError::RedundantAlternative(child));
                    }
                }
            }
        }

        Ok(Grammar {
            parsers: self.parsers,
            root,
            names: self
                .names
                .into_iter()
                .map(|(name, id)| (name.into_boxed_str(), id))
                .collect(),
        })
    }
}
