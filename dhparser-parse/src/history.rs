/*!
History tracing, reified as an observer interface rather than a baked-in
cross-cutting concern. [`Grammar::parse`][crate::Grammar::parse] calls an
observer's [`HistoryObserver::on_event`] at the entry/exit of every parser
invocation when [`crate::Config::history_tracking`] is set; the default
observer is an in-memory `Vec`, but a caller can plug in a no-op or a
file-backed one without touching the engine.
*/

use crate::kind::ParserId;

/// The outcome of a single parser invocation, as recorded in a
/// [`HistoryEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The parser matched.
    Match,
    /// The parser did not match (ordinary backtracking).
    Fail,
    /// The parser's match was itself a mandatory-continuation or resume
    /// recovery (an error was recorded).
    Error,
}

/// One entry in the parse history: which parser ran, where, what happened,
/// and a short excerpt of the text remaining at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The parser that ran.
    pub parser: ParserId,
    /// The rule name bound to that parser, if any.
    pub name: Option<Box<str>>,
    /// The `:Ptype` tag of the parser's combinator class.
    pub ptype: &'static str,
    /// The byte offset this invocation started at.
    pub location: usize,
    /// What happened.
    pub status: Status,
    /// A short, bounded excerpt of the text remaining at `location`, for
    /// human-readable trace dumps.
    pub excerpt: Box<str>,
}

/// The maximum length, in bytes, of a [`HistoryEntry::excerpt`].
pub const EXCERPT_LEN: usize = 20;

pub(crate) fn excerpt(remaining: &str) -> Box<str> {
    let cut = remaining
        .char_indices()
        .nth(EXCERPT_LEN)
        .map(|(i, _)| i)
        .unwrap_or(remaining.len());
    let head = remaining[..cut].replace('\n', " ");
    if cut < remaining.len() {
        format!("{head}...").into_boxed_str()
    } else {
        head.into_boxed_str()
    }
}

/// Observes parser invocations as they happen. Implementations may be
/// no-op, in-memory, or file-backed; the engine only ever calls
/// [`on_event`][Self::on_event], never inspects the observer otherwise.
pub trait HistoryObserver {
    /// Called once per parser invocation, after the invocation has
    /// completed (so `status` and `location` reflect the outcome).
    fn on_event(&mut self, entry: HistoryEntry);
}

/// The default observer: appends every entry to a `Vec`, in invocation
/// order (which, because the engine is a single synchronous call chain, is
/// also call order).
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    entries: Vec<HistoryEntry>,
}

impl InMemoryHistory {
    /// A fresh, empty history.
    pub fn new() -> Self {
        InMemoryHistory::default()
    }

    /// The recorded entries, in invocation order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

impl HistoryObserver for InMemoryHistory {
    fn on_event(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }
}

/// An observer that discards every event; the default when
/// [`crate::Config::history_tracking`] is false, so the engine never pays
/// for bookkeeping it was not asked to do.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHistory;

impl HistoryObserver for NullHistory {
    fn on_event(&mut self, _entry: HistoryEntry) {}
}
