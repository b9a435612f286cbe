/*!
A zero-copy, bounds-checked window over an immutable source buffer.

A [`StringView`] never materializes a new `String`; every operation either
returns a borrowed `&str`, a position relative to the view, or delegates to
the underlying buffer restricted to `[begin, end)`. This is what lets a
parser re-slice the same source text thousands of times during a parse
without falling into the O(n²) trap of repeated `String` allocation.
*/

#![deny(missing_docs)]

mod lookbehind;
mod regexsupport;

pub use lookbehind::LookbehindPattern;
pub use regexsupport::{RegexError, ViewMatch};

use std::cmp::min;

use memchr::memmem;
use regex::Regex;

/// `text[begin:end]`, without copying.
///
/// Invariants: `0 <= begin <= end <= text.len()`; `begin` and `end` always
/// fall on UTF-8 character boundaries of `text` (this is upheld by
/// construction: every constructor either takes the full string or derives
/// new bounds from a regex/search match, which are always boundary-aligned).
#[derive(Debug, Clone, Copy)]
pub struct StringView<'a> {
    text: &'a str,
    begin: usize,
    end: usize,
}

impl<'a> PartialEq for StringView<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<'a> Eq for StringView<'a> {}

impl<'a> std::hash::Hash for StringView<'a> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl<'a> StringView<'a> {
    /// A view over the entire string.
    pub fn new(text: &'a str) -> Self {
        StringView {
            text,
            begin: 0,
            end: text.len(),
        }
    }

    /// An empty view at the start of an empty buffer. Useful as a sentinel.
    pub const fn empty() -> StringView<'static> {
        StringView {
            text: "",
            begin: 0,
            end: 0,
        }
    }

    /// The length of the view, in bytes.
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// True if the view is empty.
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// The absolute offset of the start of this view into its buffer.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// The absolute offset of the end of this view into its buffer.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Materialize the content of this view as a borrowed `&str`. O(1); this
    /// never copies.
    pub fn as_str(&self) -> &'a str {
        &self.text[self.begin..self.end]
    }

    /// Translate an absolute offset into the underlying buffer to a position
    /// relative to this view. Panics if `absolute` falls outside the view's
    /// bounds, since that would mean handing back a position that looks
    /// valid but refers to text the view doesn't grant access to.
    pub fn index(&self, absolute: usize) -> usize {
        assert!(
            absolute >= self.begin && absolute <= self.end,
            "absolute position {absolute} is outside of the view [{}, {})",
            self.begin,
            self.end
        );
        absolute - self.begin
    }

    /// Resolve a possibly-negative, `str::len`-relative index the way
    /// Python-ish slicing conventions do: negative indices count back from
    /// the end of the view, and out-of-range indices clamp to the nearest
    /// valid bound rather than panicking.
    fn resolve_index(&self, index: isize) -> usize {
        let len = self.len() as isize;
        let resolved = if index < 0 { len + index } else { index };
        resolved.clamp(0, len) as usize
    }

    /// Take a sub-view of this view, in O(1), sharing the same underlying
    /// buffer. `start` and `end` are relative to this view (not absolute),
    /// support negative indices (counting back from the end), and clamp to
    /// the view's own bounds rather than panicking when out of range.
    pub fn sub_view(&self, start: isize, end: isize) -> StringView<'a> {
        let start = self.resolve_index(start);
        let end = self.resolve_index(end);
        let (start, end) = if start <= end { (start, end) } else { (end, end) };

        // keep slice boundaries valid even when a caller passes a byte
        // offset that lands inside a multi-byte character
        let begin = self.begin + start;
        let finish = self.begin + end;
        let begin = self.nearest_boundary(begin);
        let finish = self.nearest_boundary(finish.max(begin));

        StringView {
            text: self.text,
            begin,
            end: finish,
        }
    }

    fn nearest_boundary(&self, mut offset: usize) -> usize {
        offset = offset.min(self.text.len());
        while offset > 0 && !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    /// Find `needle` within `self[start..end)` (both view-relative, `end`
    /// defaulting to the view's length), returning a view-relative byte
    /// offset of the first match, or `None` if it isn't present.
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.find_bounded(needle, 0, self.len())
    }

    /// Like [`find`][Self::find], but searches only within
    /// `self[start..end)`.
    pub fn find_bounded(&self, needle: &str, start: usize, end: usize) -> Option<usize> {
        let start = start.min(self.len());
        let end = end.clamp(start, self.len());

        let haystack = &self.as_str().as_bytes()[start..end];
        memmem::find(haystack, needle.as_bytes()).map(|rel| rel + start)
    }

    /// Find the last occurrence of `needle` within the view, returning a
    /// view-relative byte offset, or `None` if absent.
    pub fn rfind(&self, needle: &str) -> Option<usize> {
        self.rfind_bounded(needle, 0, self.len())
    }

    /// Like [`rfind`][Self::rfind], bounded to `self[start..end)`.
    pub fn rfind_bounded(&self, needle: &str, start: usize, end: usize) -> Option<usize> {
        let start = start.min(self.len());
        let end = end.clamp(start, self.len());

        let haystack = &self.as_str().as_bytes()[start..end];
        memmem::rfind(haystack, needle.as_bytes()).map(|rel| rel + start)
    }

    /// Count non-overlapping occurrences of `needle` in the view.
    pub fn count(&self, needle: &str) -> usize {
        if needle.is_empty() {
            return 0;
        }
        let haystack = self.as_str().as_bytes();
        memmem::find_iter(haystack, needle.as_bytes()).count()
    }

    /// Test whether the view, restricted to `self[start..end)`, begins with
    /// `prefix`.
    pub fn starts_with_bounded(&self, prefix: &str, start: usize, end: usize) -> bool {
        let start = start.min(self.len());
        let end = end.clamp(start, self.len());
        self.as_str().as_bytes()[start..end].starts_with(prefix.as_bytes())
    }

    /// Test whether the view begins with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_str().starts_with(prefix)
    }

    /// Attempt to match `regex` anchored at the start of the view. Only
    /// text within `[begin, end)` is ever visible to the regex engine; the
    /// returned match's offsets are view-relative.
    pub fn regex_match(&self, regex: &Regex) -> Option<ViewMatch<'a>> {
        regexsupport::anchored_match(self, regex)
    }

    /// Search for `regex` anywhere within the view (not anchored at the
    /// start). Returns the first, leftmost match, with view-relative
    /// offsets.
    pub fn regex_search(&self, regex: &Regex) -> Option<ViewMatch<'a>> {
        regexsupport::unanchored_search(self, regex)
    }

    /// Attempt to match `regex` anchored at the start of the view, but only
    /// succeeding if `lookbehind` also matches ending exactly at the current
    /// position, scanning a bounded number of bytes backwards from `begin`.
    /// See [`LookbehindPattern`] for the width bound.
    pub fn regex_match_with_lookbehind(
        &self,
        regex: &Regex,
        lookbehind: &LookbehindPattern,
    ) -> Option<ViewMatch<'a>> {
        if !lookbehind.matches_ending_at(self.text, self.begin) {
            return None;
        }
        self.regex_match(regex)
    }

    /// The shorter of `self.len()` and `n`, used internally to bound
    /// mandatory-continuation "consume one token" recovery; exposed because
    /// callers building their own recovery heuristics need the same clamp.
    pub fn clamp_len(&self, n: usize) -> usize {
        min(self.len(), n)
    }
}

impl<'a> From<&'a str> for StringView<'a> {
    fn from(text: &'a str) -> Self {
        StringView::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_view_basic() {
        let view = StringView::new("hello world");
        let sub = view.sub_view(6, 11);
        assert_eq!(sub.as_str(), "world");
    }

    #[test]
    fn sub_view_negative_indices() {
        let view = StringView::new("hello world");
        let sub = view.sub_view(-5, -1);
        assert_eq!(sub.as_str(), "worl");
    }

    #[test]
    fn sub_view_out_of_range_clamps() {
        let view = StringView::new("hi");
        let sub = view.sub_view(0, 1000);
        assert_eq!(sub.as_str(), "hi");
    }

    #[test]
    fn sub_view_is_associative() {
        // view[a:b][c:d] == view[a+c : min(a+d, b)]
        let text = "the quick brown fox jumps over the lazy dog";
        let view = StringView::new(text);

        for a in 0..10usize {
            for b in a..20usize {
                for c in 0..(b - a) {
                    for d in c..(b - a) {
                        let outer = view.sub_view(a as isize, b as isize);
                        let lhs = outer.sub_view(c as isize, d as isize);

                        let rhs_end = min(a + d, b);
                        let rhs = view.sub_view(a as isize, rhs_end as isize);
                        let rhs = rhs.sub_view(c as isize, (rhs_end - a) as isize);

                        assert_eq!(lhs.as_str(), rhs.as_str());
                    }
                }
            }
        }
    }

    #[test]
    fn find_is_view_relative() {
        let text = "xxxneedlexxx";
        let view = StringView::new(text).sub_view(3, 9);
        assert_eq!(view.as_str(), "needle");
        assert_eq!(view.find("needle"), Some(0));
        assert_eq!(view.find("xxx"), None);
    }

    #[test]
    fn find_matches_buffer_level_search_offset_by_begin() {
        // StringView(text, a, b).find(sub) == text.find(sub, a, b) - a
        let text = "abc needle def needle ghi";
        for (a, b) in [(0, text.len()), (4, 22), (10, 20)] {
            let view = StringView::new(text).sub_view(a as isize, b as isize);
            let buffer_relative = text[a..b].find("needle");
            let view_relative = view.find("needle");
            assert_eq!(
                view_relative,
                buffer_relative,
                "mismatch for bounds [{a}, {b})"
            );
        }
    }

    #[test]
    fn rfind_view_relative() {
        let view = StringView::new("aXbXc");
        assert_eq!(view.rfind("X"), Some(3));
    }

    #[test]
    fn count_occurrences() {
        let view = StringView::new("ababab");
        assert_eq!(view.count("ab"), 3);
        assert_eq!(view.count("aba"), 1);
    }

    #[test]
    fn starts_with_bounded_respects_bounds() {
        let view = StringView::new("prefix-middle-suffix");
        assert!(view.starts_with_bounded("prefix", 0, 6));
        assert!(!view.starts_with_bounded("middle", 0, 6));
    }

    #[test]
    fn regex_match_is_anchored_and_view_relative() {
        let re = Regex::new(r"\d+").unwrap();
        let view = StringView::new("abc123def").sub_view(3, 6);
        assert_eq!(view.as_str(), "123");
        let m = view.regex_match(&re).expect("should match");
        assert_eq!(m.as_str(), "123");
        assert_eq!(m.start(), 0);
        assert_eq!(m.end(), 3);
    }

    #[test]
    fn regex_match_refuses_to_see_past_end() {
        let re = Regex::new(r"\d+").unwrap();
        let view = StringView::new("123456").sub_view(0, 3);
        let m = view.regex_match(&re).expect("should match");
        assert_eq!(m.as_str(), "123");
    }

    #[test]
    fn regex_search_finds_unanchored_match() {
        let re = Regex::new(r"\d+").unwrap();
        let view = StringView::new("abc123def");
        let m = view.regex_search(&re).expect("should match");
        assert_eq!(m.as_str(), "123");
        assert_eq!(m.start(), 3);
    }

    #[test]
    fn index_translates_absolute_to_relative() {
        let view = StringView::new("0123456789").sub_view(3, 8);
        assert_eq!(view.index(3), 0);
        assert_eq!(view.index(8), 5);
    }

    #[test]
    #[should_panic]
    fn index_out_of_bounds_panics() {
        let view = StringView::new("0123456789").sub_view(3, 8);
        view.index(9);
    }
}
