/*!
Glue between [`crate::StringView`] and the `regex` crate: anchored and
unanchored matching that never lets the engine see text outside the view's
bounds, with results translated back to view-relative offsets.
*/

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use regex::Regex;
use thiserror::Error;

use crate::StringView;

/// Error constructing a regex-backed parser. Reserved for future use (e.g.
/// validating verbose-mode patterns at grammar-build time); `regex` itself
/// reports most compile errors through `regex::Error`, which this wraps.
#[derive(Debug, Error)]
pub enum RegexError {
    /// The underlying pattern failed to compile.
    #[error("invalid regular expression: {0}")]
    Invalid(#[from] regex::Error),
}

/// A regex match, with offsets relative to the [`StringView`] it was found
/// in rather than the underlying buffer.
#[derive(Debug, Clone, Copy)]
pub struct ViewMatch<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

impl<'a> ViewMatch<'a> {
    /// The view-relative byte offset where the match starts.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The view-relative byte offset where the match ends.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The matched text.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// The length, in bytes, of the matched text.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if the match was zero-length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The per-process cache of `^`-anchored variants of grammar patterns,
/// keyed by the original pattern's source text. Built once per distinct
/// pattern and cloned thereafter (`Regex::clone` is a cheap `Arc` bump), so
/// repeated failed matches at a given position cost one anchored scan
/// rather than one regex compilation.
fn anchored_cache() -> &'static Mutex<HashMap<String, Regex>> {
    static CACHE: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// The `^`-anchored variant of `regex`, built (and cached) on first use.
/// Anchoring at compile time rather than checking `m.start() == 0` after an
/// unanchored `find` means the `regex` crate's own literal-prefix analysis
/// rejects a non-match at the haystack's start immediately, instead of
/// scanning the rest of the haystack for a match that will be thrown away.
fn anchored_regex(regex: &Regex) -> Regex {
    let pattern = regex.as_str();
    let mut cache = anchored_cache().lock().unwrap();
    if let Some(anchored) = cache.get(pattern) {
        return anchored.clone();
    }
    let anchored = Regex::new(&format!("^(?:{pattern})"))
        .expect("wrapping an already-valid pattern in a non-capturing group stays valid");
    cache.insert(pattern.to_string(), anchored.clone());
    anchored
}

pub(crate) fn anchored_match<'a>(view: &StringView<'a>, regex: &Regex) -> Option<ViewMatch<'a>> {
    let haystack = view.as_str();
    let anchored = anchored_regex(regex);
    let m = anchored.find(haystack)?;

    Some(ViewMatch {
        text: m.as_str(),
        start: m.start(),
        end: m.end(),
    })
}

pub(crate) fn unanchored_search<'a>(
    view: &StringView<'a>,
    regex: &Regex,
) -> Option<ViewMatch<'a>> {
    let haystack = view.as_str();
    let m = regex.find(haystack)?;

    Some(ViewMatch {
        text: m.as_str(),
        start: m.start(),
        end: m.end(),
    })
}
