/*!
The dispatch core: `run` executes one [`ParserId`] at one input location,
implementing the memoized seed-and-grow left-recursion protocol uniformly
for every combinator, and `execute` is the single `match` over
[`ParserKind`] that dispatches each combinator variant. Every other module
in this crate either feeds this function a [`Grammar`] and [`ParseState`],
or reads the [`dhparser_syntax::Node`]/[`dhparser_syntax::Error`] values it
produces.
*/

use regex::Regex;

use dhparser_stringview::StringView;
use dhparser_syntax::{Error, ErrorLevel, Node};

use crate::grammar::Grammar;
use crate::kind::{ParserId, ParserKind, RepetitionBound};
use crate::state::{MemoEntry, ParseState};

fn current_view<'a>(full: StringView<'a>, loc: usize) -> StringView<'a> {
    full.sub_view(loc as isize, full.len() as isize)
}

fn is_dropped(grammar: &Grammar, id: ParserId) -> bool {
    matches!(grammar.entry(id).kind, ParserKind::Drop(_))
}

/// The earliest position at or after `pos` where some `skip_rules` regex
/// matches, searched over the remainder of the text. `None` if none match
/// anywhere ahead.
fn find_skip_target(full: StringView, pos: usize, skip_rules: &[Regex]) -> Option<usize> {
    let view = current_view(full, pos);
    skip_rules
        .iter()
        .filter_map(|re| view.regex_search(re).map(|m| pos + m.start()))
        .min()
}

/// Advance `n` Unicode scalar values from `pos`, or to end-of-input if
/// fewer than `n` remain. Used as the mandatory-continuation recovery
/// fallback when the enclosing rule has no `@..._skip` rule registered.
fn advance_by_chars(full: StringView, pos: usize, n: usize) -> usize {
    let s = current_view(full, pos).as_str();
    if s.is_empty() {
        return pos;
    }
    match s.char_indices().nth(n.max(1) - 1) {
        Some((i, ch)) => pos + i + ch.len_utf8(),
        None => pos + s.len(),
    }
}

fn rule_label<'a>(name: Option<&'a str>) -> &'a str {
    name.unwrap_or("<anonymous>")
}

/// Run the parser `id` at byte offset `loc` in `full`. Implements the
/// memo/depth protocol: a cached result short-circuits
/// execution entirely; otherwise the recursion-depth bound guards against
/// unbounded direct left recursion, and any result is reconciled against a
/// seed stored by a left-recursive self-call during this very invocation
/// (longer match wins, ties favor the earlier-stored seed).
pub(crate) fn run(
    grammar: &Grammar,
    state: &mut ParseState,
    id: ParserId,
    full: StringView,
    loc: usize,
) -> (Option<Node>, usize) {
    if let Some(entry) = state.memo_get(id, loc) {
        let result = (Some(entry.node.clone()), entry.new_location);
        trace(grammar, state, id, full, loc, crate::history::Status::Match);
        return result;
    }

    if state.depth_of(id, loc) > state.config.left_recursion_depth {
        trace(grammar, state, id, full, loc, crate::history::Status::Fail);
        return (None, loc);
    }

    let capture_mark = state.capture_mark();

    state.enter_depth(id, loc);
    state.push_call(id);
    let (raw_node, raw_end) = execute(grammar, state, id, full, loc);
    state.pop_call();
    state.leave_depth(id, loc);

    let had_seed = state.memo_get(id, loc).is_some();
    let mut result = match (raw_node, had_seed) {
        (Some(node), true) => {
            let seed = state.memo_get(id, loc).expect("checked above").clone();
            if raw_end > seed.new_location {
                (Some(node), raw_end)
            } else {
                (Some(seed.node), seed.new_location)
            }
        }
        (Some(node), false) => (Some(node), raw_end),
        (None, true) => {
            let seed = state.memo_get(id, loc).expect("checked above").clone();
            (Some(seed.node), seed.new_location)
        }
        (None, false) => (None, loc),
    };

    // A no-match never mutates shared state past the point of failure: any
    // `Capture` pushed while trying (and failing) this parser must not
    // leak to a sibling `Retrieve`/`Pop` once this invocation backtracks.
    // This runs before `@..._resume` recovery below, since a resumed match
    // is a fabricated recovery node, not a continuation of the failed
    // attempt's own captures.
    if result.0.is_none() {
        state.capture_rollback(capture_mark);
    }

    // `@..._resume` recovery: the rule bound to `id` failed outright (not a
    // `§` mandatory-continuation site; those are handled inside the
    // `Series` arm of `execute`). If a resume rule is registered, convert
    // the failure into a single recovered match so the caller one level up
    // can keep going.
    let mut resumed = false;
    if result.0.is_none() {
        let entry = grammar.entry(id);
        if !entry.resume_rules.is_empty() && state.recovery_budget_remaining() {
            if let Some(resume_at) = find_skip_target(full, loc, &entry.resume_rules) {
                state.spend_recovery();
                let rule_name = rule_label(entry.name.as_deref());
                state.push_error(Error::error(
                    format!(
                        "rule '{rule_name}' failed to match; resuming at the next recovery point"
                    ),
                    dhparser_syntax::RULE_RESUME_ERROR,
                    loc,
                ));
                let skipped_text = full.sub_view(loc as isize, resume_at as isize).as_str();
                if state.config.resume_notices {
                    state.push_error(Error::new(
                        format!("resume skipped {skipped_text:?}"),
                        dhparser_syntax::RESUME_NOTICE,
                        ErrorLevel::Warning,
                        loc,
                    ));
                }
                let tag = entry
                    .name
                    .clone()
                    .unwrap_or_else(|| entry.kind.ptype().to_string().into_boxed_str());
                result = (
                    Some(Node::branch(tag, vec![Node::leaf(":error_skip", skipped_text)])),
                    resume_at,
                );
                resumed = true;
            }
        }
    }

    if let Some(node) = &mut result.0 {
        if let Some(name) = grammar.entry(id).name.clone() {
            node.set_name(name);
        }
        state.memo_set(
            id,
            loc,
            MemoEntry {
                node: node.clone(),
                new_location: result.1,
            },
        );
    }

    let status = match (&result.0, resumed) {
        (Some(_), true) => crate::history::Status::Error,
        (Some(_), false) => crate::history::Status::Match,
        (None, _) => crate::history::Status::Fail,
    };
    trace(grammar, state, id, full, loc, status);
    result
}

fn trace(
    grammar: &Grammar,
    state: &mut ParseState,
    id: ParserId,
    full: StringView,
    loc: usize,
    status: crate::history::Status,
) {
    if !state.config.history_tracking {
        return;
    }
    use crate::history::{excerpt, HistoryEntry};

    let entry = grammar.entry(id);
    let remaining = current_view(full, loc).as_str();
    state.record(HistoryEntry {
        parser: id,
        name: entry.name.clone(),
        ptype: entry.kind.ptype(),
        location: loc,
        status,
        excerpt: excerpt(remaining),
    });
}

fn execute(
    grammar: &Grammar,
    state: &mut ParseState,
    id: ParserId,
    full: StringView,
    loc: usize,
) -> (Option<Node>, usize) {
    let entry = grammar.entry(id);
    let tag: Box<str> = entry
        .name
        .clone()
        .unwrap_or_else(|| entry.kind.ptype().to_string().into_boxed_str());

    match &entry.kind {
        ParserKind::Literal { text, literal_ws } => {
            let view = current_view(full, loc);
            if view.starts_with(text) {
                let mut end = loc + text.len();
                let mut content = text.clone();
                if let Some(ws_id) = literal_ws {
                    let (ws_node, ws_end) = run(grammar, state, *ws_id, full, end);
                    // Trailing whitespace is part of this token's match, not a
                    // sibling of its own, so fold its text into the leaf
                    // rather than discarding it: otherwise `to_text()` would
                    // silently lose the bytes between this token and the
                    // next, breaking the round-trip invariant.
                    if let Some(ws_node) = ws_node {
                        content.push_str(&ws_node.to_text());
                    }
                    end = ws_end;
                }
                (Some(Node::leaf(tag, content)), end)
            } else {
                (None, loc)
            }
        }

        ParserKind::RegExp(re) => {
            let view = current_view(full, loc);
            match view.regex_match(re) {
                Some(m) => (Some(Node::leaf(tag, m.as_str())), loc + m.len()),
                None => (None, loc),
            }
        }

        ParserKind::Whitespace(re) => {
            let view = current_view(full, loc);
            match view.regex_match(re) {
                Some(m) => (Some(Node::leaf(":whitespace", m.as_str())), loc + m.len()),
                None => (None, loc),
            }
        }

        ParserKind::Drop(inner) => {
            let (node, end) = run(grammar, state, *inner, full, loc);
            match node {
                Some(_) => (Some(Node::leaf(":drop", "")), end),
                None => (None, loc),
            }
        }

        ParserKind::Series { children, mandatory } => {
            run_series(grammar, state, entry, tag, children, *mandatory, full, loc)
        }

        ParserKind::Alternative(children) => {
            for child_id in children {
                let (node, new_pos) = run(grammar, state, *child_id, full, loc);
                if node.is_some() {
                    return (node, new_pos);
                }
            }
            (None, loc)
        }

        ParserKind::Option_(p) => {
            let (node, new_pos) = run(grammar, state, *p, full, loc);
            match node {
                Some(n) => (Some(n), new_pos),
                None => (Some(Node::branch(":option", Vec::new())), loc),
            }
        }

        ParserKind::ZeroOrMore(p) => {
            run_repetition_node(grammar, state, *p, tag, full, loc, RepetitionBound::new(0, None))
        }

        ParserKind::OneOrMore(p) => {
            run_repetition_node(grammar, state, *p, tag, full, loc, RepetitionBound::new(1, None))
        }

        ParserKind::Counted(p, bound) => {
            run_repetition_node(grammar, state, *p, tag, full, loc, *bound)
        }

        ParserKind::Interleave(parts) => run_interleave(grammar, state, tag, parts, full, loc),

        ParserKind::Lookahead(p) => {
            let (node, _) = run(grammar, state, *p, full, loc);
            match node {
                Some(_) => (Some(Node::leaf(tag, "")), loc),
                None => (None, loc),
            }
        }

        ParserKind::NegativeLookahead(p) => {
            let (node, _) = run(grammar, state, *p, full, loc);
            match node {
                Some(_) => (None, loc),
                None => (Some(Node::leaf(tag, "")), loc),
            }
        }

        ParserKind::Lookbehind(pattern) => {
            if pattern.matches_ending_at(full.as_str(), loc) {
                (Some(Node::leaf(tag, "")), loc)
            } else {
                (None, loc)
            }
        }

        ParserKind::NegativeLookbehind(pattern) => {
            if pattern.matches_ending_at(full.as_str(), loc) {
                (None, loc)
            } else {
                (Some(Node::leaf(tag, "")), loc)
            }
        }

        ParserKind::Required(p) => {
            let (node, new_pos) = run(grammar, state, *p, full, loc);
            match node {
                Some(n) => (Some(n), new_pos),
                None => {
                    if !state.recovery_budget_remaining() {
                        (None, loc)
                    } else {
                        state.spend_recovery();
                        mandatory_recovery(
                            state,
                            entry.name.as_deref(),
                            &entry.skip_rules,
                            entry.error_template.as_deref(),
                            full,
                            loc,
                        )
                    }
                }
            }
        }

        ParserKind::Capture { name, child } => {
            let (node, new_pos) = run(grammar, state, *child, full, loc);
            if let Some(n) = &node {
                state.capture_push(name, n.to_text());
            }
            (node, new_pos)
        }

        ParserKind::Retrieve { name, counterpart } => {
            match state.capture_top(name).map(str::to_string) {
                Some(top) => {
                    let expected = match counterpart {
                        Some(f) => f(&top),
                        None => top,
                    };
                    let view = current_view(full, loc);
                    if view.starts_with(&expected) {
                        let end = loc + expected.len();
                        (Some(Node::leaf(tag, expected)), end)
                    } else {
                        (None, loc)
                    }
                }
                None => (None, loc),
            }
        }

        ParserKind::Pop { name, counterpart } => {
            match state.capture_top(name).map(str::to_string) {
                Some(top) => {
                    let expected = match counterpart {
                        Some(f) => f(&top),
                        None => top,
                    };
                    let view = current_view(full, loc);
                    if view.starts_with(&expected) {
                        state.capture_pop(name);
                        let end = loc + expected.len();
                        (Some(Node::leaf(tag, expected)), end)
                    } else {
                        (None, loc)
                    }
                }
                None => (None, loc),
            }
        }

        ParserKind::Forward(target) => match target {
            Some(t) => run(grammar, state, *t, full, loc),
            None => (None, loc),
        },

        ParserKind::Synonym(p) => run(grammar, state, *p, full, loc),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_series(
    grammar: &Grammar,
    state: &mut ParseState,
    entry: &crate::grammar::ParserEntry,
    tag: Box<str>,
    children: &[ParserId],
    mandatory: usize,
    full: StringView,
    loc: usize,
) -> (Option<Node>, usize) {
    let mut pos = loc;
    let mut out = Vec::with_capacity(children.len());

    for (i, child_id) in children.iter().enumerate() {
        let (node, new_pos) = run(grammar, state, *child_id, full, pos);
        match node {
            Some(n) => {
                pos = new_pos;
                if !is_dropped(grammar, *child_id) {
                    out.push(n);
                }
            }
            None => {
                if i < mandatory {
                    return (None, loc);
                }
                if !state.recovery_budget_remaining() {
                    return (None, loc);
                }
                state.spend_recovery();
                let (node, new_pos) = mandatory_recovery(
                    state,
                    entry.name.as_deref(),
                    &entry.skip_rules,
                    entry.error_template.as_deref(),
                    full,
                    pos,
                );
                if let Some(n) = node {
                    out.push(n);
                }
                pos = new_pos;
            }
        }
    }

    (Some(Node::branch(tag, out)), pos)
}

/// Shared mandatory-continuation recovery: record an error, then advance
/// past the offending point using the enclosing rule's `@..._skip` rules
/// (or, absent any, a fixed number of characters), wrapping the skipped
/// span in an anonymous node so it is not lost from the tree.
///
/// Note that `state.spend_recovery()` must be called by callers before
/// invoking this: `Required` calls it as part of its own no-match arm, and
/// `Series` calls it right before calling this function, so it is not
/// duplicated here.
fn mandatory_recovery(
    state: &mut ParseState,
    rule_name: Option<&str>,
    skip_rules: &[Regex],
    error_template: Option<&str>,
    full: StringView,
    pos: usize,
) -> (Option<Node>, usize) {
    let at_eof = pos >= full.len();
    let (code, default_msg) = if at_eof {
        (
            dhparser_syntax::MANDATORY_CONTINUATION_AT_EOF,
            format!(
                "mandatory continuation of '{}' violated at end of input",
                rule_label(rule_name)
            ),
        )
    } else {
        (
            dhparser_syntax::MANDATORY_CONTINUATION,
            format!("mandatory continuation of '{}' violated", rule_label(rule_name)),
        )
    };
    let message = error_template.map(str::to_string).unwrap_or(default_msg);
    state.push_error(Error::error(message, code, pos));

    let skip_to = find_skip_target(full, pos, skip_rules)
        .unwrap_or_else(|| advance_by_chars(full, pos, state.config.mandatory_recovery_chars));

    if skip_to > pos {
        let skipped_text = full.sub_view(pos as isize, skip_to as isize).as_str();
        (Some(Node::leaf(":error_skip", skipped_text)), skip_to)
    } else {
        (None, skip_to)
    }
}

/// The shared "seed-one-zero-length-match-then-require-progress" repetition
/// loop used by `ZeroOrMore`/`OneOrMore`/`Counted`/`Interleave` (`DESIGN.md`
/// Open Question 1): a repetition body may match empty once at a given
/// position, but a second consecutive empty match at that same position
/// terminates the loop rather than looping forever.
fn run_repetition(
    grammar: &Grammar,
    state: &mut ParseState,
    p: ParserId,
    full: StringView,
    loc: usize,
    bound: RepetitionBound,
) -> (Option<Vec<Node>>, usize, usize) {
    let mut pos = loc;
    let mut children = Vec::new();
    let mut count = 0usize;
    let mut prev_empty_at: Option<usize> = None;

    loop {
        if !bound.allows_more(count) {
            break;
        }
        let (node, new_pos) = run(grammar, state, p, full, pos);
        match node {
            None => break,
            Some(n) => {
                let is_empty = new_pos == pos;
                if is_empty {
                    if prev_empty_at == Some(pos) {
                        break;
                    }
                    prev_empty_at = Some(pos);
                } else {
                    prev_empty_at = None;
                }
                if !is_dropped(grammar, p) {
                    children.push(n);
                }
                count += 1;
                pos = new_pos;
            }
        }
    }

    if bound.satisfied_by(count) {
        (Some(children), pos, count)
    } else {
        (None, loc, count)
    }
}

fn run_repetition_node(
    grammar: &Grammar,
    state: &mut ParseState,
    p: ParserId,
    tag: Box<str>,
    full: StringView,
    loc: usize,
    bound: RepetitionBound,
) -> (Option<Node>, usize) {
    let (children, pos, _) = run_repetition(grammar, state, p, full, loc, bound);
    match children {
        Some(c) => (Some(Node::branch(tag, c)), pos),
        None => (None, loc),
    }
}

fn run_interleave(
    grammar: &Grammar,
    state: &mut ParseState,
    tag: Box<str>,
    parts: &[(ParserId, RepetitionBound)],
    full: StringView,
    loc: usize,
) -> (Option<Node>, usize) {
    let mut counts = vec![0usize; parts.len()];
    let mut pos = loc;
    let mut children = Vec::new();
    let mut prev_empty_at: Option<usize> = None;

    loop {
        let mut progressed = false;
        for (i, (pid, bound)) in parts.iter().enumerate() {
            if !bound.allows_more(counts[i]) {
                continue;
            }
            let (node, new_pos) = run(grammar, state, *pid, full, pos);
            if let Some(n) = node {
                let is_empty = new_pos == pos;
                if is_empty && prev_empty_at == Some(pos) {
                    continue;
                }
                prev_empty_at = if is_empty { Some(pos) } else { None };
                if !is_dropped(grammar, *pid) {
                    children.push(n);
                }
                counts[i] += 1;
                pos = new_pos;
                progressed = true;
                break;
            }
        }
        if !progressed {
            break;
        }
    }

    let all_satisfied = parts
        .iter()
        .enumerate()
        .all(|(i, (_, bound))| bound.satisfied_by(counts[i]));

    if all_satisfied {
        (Some(Node::branch(tag, children)), pos)
    } else {
        (None, loc)
    }
}
