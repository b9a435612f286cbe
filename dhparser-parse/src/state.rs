/*!
[`ParseState`]: everything that is mutable during exactly one call to
[`crate::Grammar::parse`]: the memo table, left-recursion depth counters,
named capture stacks, call stack (for history tracing), and the error
accumulator. All of this must reset at the start of every parse and must
never be reused reentrantly; this is enforced by construction, since a
fresh [`ParseState`] is built on every [`crate::Grammar::parse`] call and
never escapes it.
*/

use std::collections::HashMap;

use dhparser_syntax::{Error, Node};

use crate::history::{HistoryEntry, HistoryObserver};
use crate::kind::ParserId;
use crate::Config;

/// A memoized parse result: the node a parser produced and the position it
/// left the input at. Only successful matches are ever memoized; a plain
/// no-match is never cached, since caching it would require a second map
/// just to distinguish "never tried" from "tried and failed", and nothing
/// in the left-recursion protocol needs that distinction.
#[derive(Debug, Clone)]
pub(crate) struct MemoEntry {
    pub node: Node,
    pub new_location: usize,
}

/// A read-only snapshot of one named capture stack's contents, most
/// recently pushed value last. Exposed for debugging.
pub type CaptureStackSnapshot = Vec<String>;

/// Per-parse mutable state: memo table, recursion depth counters, capture
/// stacks, call stack, and accumulated errors. Constructed fresh by
/// [`crate::Grammar::parse`]; never shared across parses or threads.
pub struct ParseState<'o> {
    pub(crate) config: Config,
    memo: HashMap<(ParserId, usize), MemoEntry>,
    depth: HashMap<(ParserId, usize), u32>,
    captures: HashMap<Box<str>, Vec<String>>,
    call_stack: Vec<ParserId>,
    errors: Vec<Error>,
    observer: &'o mut dyn HistoryObserver,
    dropout_count: u32,
}

/// The cap the source calls `MAX_DROPOUTS`: once this many
/// mandatory-continuation/resume recoveries have fired in a single parse,
/// the engine stops attempting further local recovery and lets failures
/// propagate, rather than risk quadratic-time cascades of one-error-per-
/// character on thoroughly malformed input.
pub const MAX_DROPOUTS: u32 = 25;

impl<'o> ParseState<'o> {
    pub(crate) fn new(config: Config, observer: &'o mut dyn HistoryObserver) -> Self {
        ParseState {
            config,
            memo: HashMap::new(),
            depth: HashMap::new(),
            captures: HashMap::new(),
            call_stack: Vec::new(),
            errors: Vec::new(),
            observer,
            dropout_count: 0,
        }
    }

    pub(crate) fn memo_get(&self, id: ParserId, loc: usize) -> Option<&MemoEntry> {
        self.memo.get(&(id, loc))
    }

    pub(crate) fn memo_set(&mut self, id: ParserId, loc: usize, entry: MemoEntry) {
        self.memo.insert((id, loc), entry);
    }

    pub(crate) fn depth_of(&self, id: ParserId, loc: usize) -> u32 {
        *self.depth.get(&(id, loc)).unwrap_or(&0)
    }

    pub(crate) fn enter_depth(&mut self, id: ParserId, loc: usize) {
        *self.depth.entry((id, loc)).or_insert(0) += 1;
    }

    pub(crate) fn leave_depth(&mut self, id: ParserId, loc: usize) {
        if let Some(count) = self.depth.get_mut(&(id, loc)) {
            *count = count.saturating_sub(1);
        }
    }

    pub(crate) fn push_call(&mut self, id: ParserId) {
        self.call_stack.push(id);
    }

    pub(crate) fn pop_call(&mut self) {
        self.call_stack.pop();
    }

    pub(crate) fn record(&mut self, entry: HistoryEntry) {
        if self.config.history_tracking {
            self.observer.on_event(entry);
        }
    }

    pub(crate) fn push_error(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub(crate) fn take_errors(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }

    /// True if recovery should still be attempted: bounds the total number
    /// of mandatory-continuation/resume recoveries in one parse.
    pub(crate) fn recovery_budget_remaining(&self) -> bool {
        self.dropout_count < MAX_DROPOUTS
    }

    pub(crate) fn spend_recovery(&mut self) {
        self.dropout_count += 1;
    }

    /// Push `text` onto the named capture stack.
    pub(crate) fn capture_push(&mut self, name: &str, text: String) {
        self.captures.entry(name.into()).or_default().push(text);
    }

    /// The current top of the named capture stack, if any.
    pub(crate) fn capture_top(&self, name: &str) -> Option<&str> {
        self.captures.get(name)?.last().map(String::as_str)
    }

    /// Pop and return the top of the named capture stack.
    pub(crate) fn capture_pop(&mut self, name: &str) -> Option<String> {
        self.captures.get_mut(name)?.pop()
    }

    /// Snapshot every named capture stack, to be restored with
    /// [`Self::capture_rollback`] if the parser invocation that follows
    /// turns out to be a no-match. `None` means the stacks were empty, the
    /// common case, so a failed attempt that never touched `Capture` skips
    /// the clone entirely.
    pub(crate) fn capture_mark(&self) -> Option<HashMap<Box<str>, Vec<String>>> {
        if self.captures.is_empty() {
            None
        } else {
            Some(self.captures.clone())
        }
    }

    /// Restore the capture stacks to a prior [`Self::capture_mark`]. A
    /// no-match never mutates shared state past the point of failure, so
    /// any value a `Capture` pushed during an invocation that ultimately
    /// failed must not remain visible to a sibling `Retrieve`/`Pop`.
    pub(crate) fn capture_rollback(&mut self, mark: Option<HashMap<Box<str>, Vec<String>>>) {
        match mark {
            Some(snapshot) => self.captures = snapshot,
            None => self.captures.clear(),
        }
    }

    /// A read-only snapshot of every named capture stack's current
    /// contents, for debugging.
    pub fn capture_snapshot(&self) -> HashMap<String, CaptureStackSnapshot> {
        self.captures
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}
