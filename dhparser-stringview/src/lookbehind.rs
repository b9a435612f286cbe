/*!
Bounded-width lookbehind on top of the plain `regex` crate.

`regex` (unlike PCRE-style engines) has no native lookaround, so a
lookbehind assertion is approximated here: the pattern is anchored at both
ends and tried against every candidate prefix ending at the assertion point,
walking backwards from there up to [`LookbehindPattern::MAX_WIDTH`] bytes.
This is a deliberate, documented limitation (see `DESIGN.md`, "Regex
backend") rather than unbounded backtracking.
*/

use regex::Regex;

use crate::regexsupport::RegexError;

/// A lookbehind assertion: matches if *some* bounded-width prefix ending at
/// the assertion point satisfies the wrapped pattern.
#[derive(Debug, Clone)]
pub struct LookbehindPattern {
    exact: Regex,
}

impl LookbehindPattern {
    /// The maximum number of bytes this lookbehind will scan backwards
    /// before giving up. Chosen generously for typical EBNF lookbehind use
    /// (single tokens, short keywords) while keeping worst-case cost
    /// bounded regardless of how far back the caller's position is.
    pub const MAX_WIDTH: usize = 64;

    /// Compile a lookbehind pattern. `pattern` should describe the text that
    /// must immediately precede the assertion point; it is implicitly
    /// anchored at both ends.
    pub fn new(pattern: &str) -> Result<Self, RegexError> {
        let exact = Regex::new(&format!("(?:{pattern})$"))?;
        Ok(LookbehindPattern { exact })
    }

    /// True if some suffix of `text[..pos]`, of at most
    /// [`MAX_WIDTH`][Self::MAX_WIDTH] bytes, fully matches this pattern.
    pub fn matches_ending_at(&self, text: &str, pos: usize) -> bool {
        let floor = pos.saturating_sub(Self::MAX_WIDTH);
        let mut start = floor;
        while start < pos && !text.is_char_boundary(start) {
            start += 1;
        }

        let window = &text[start..pos];
        self.exact.find(window).map(|m| m.end() == window.len()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_short_preceding_keyword() {
        let lb = LookbehindPattern::new("foo").unwrap();
        assert!(lb.matches_ending_at("xxfoo", 5));
        assert!(!lb.matches_ending_at("xxbar", 5));
    }

    #[test]
    fn scans_long_prefix_without_panicking_and_still_matches() {
        let lb = LookbehindPattern::new("a+").unwrap();
        let text = "a".repeat(200);
        assert!(lb.matches_ending_at(&text, text.len()));
    }

    #[test]
    fn rejects_when_window_is_cut_short_by_max_width() {
        // "foo" followed by 100 'x's: the assertion point is far enough past
        // "foo" that it falls outside the bounded lookbehind window.
        let lb = LookbehindPattern::new("foo").unwrap();
        let text = format!("foo{}", "x".repeat(100));
        assert!(!lb.matches_ending_at(&text, text.len()));
    }
}
