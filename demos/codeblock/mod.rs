//! A context-sensitive grammar for backtick-delimited code blocks whose
//! delimiter length is fixed at parse time rather than compile time:
//!
//! ```text
//! codeblock = delim body ::delim
//! delim     = /`+/
//! ```
//!
//! The closing delimiter must match the *same number* of backticks as the
//! opening one, with arbitrary-length fences allowed, as Markdown code
//! fences do, which a plain regex cannot express (the count is only known
//! once the opening delimiter has actually been matched). This is exactly
//! the case [`dhparser::ParserKind::Capture`]/[`dhparser::ParserKind::Pop`]
//! exist for.

use dhparser::{BuildError, Grammar, GrammarBuilder, ParserKind};
use regex::Regex;

/// Build the codeblock grammar, rooted at `codeblock`.
pub fn grammar() -> Result<Grammar, BuildError> {
    let mut b = GrammarBuilder::new();

    let delim_pattern = b.add(ParserKind::RegExp(Regex::new("`+").unwrap()));
    let delim = b.add(ParserKind::Capture {
        name: "fence".into(),
        child: delim_pattern,
    });

    // `body` consumes one character at a time, for as long as the captured
    // fence does *not* start here, checked via a non-advancing
    // `Retrieve` wrapped in `NegativeLookahead`, so a short run of
    // backticks inside the body (shorter than the opening fence) never
    // trips the close check.
    let fence_ahead = b.add(ParserKind::Retrieve {
        name: "fence".into(),
        counterpart: None,
    });
    let not_fence_ahead = b.add(ParserKind::NegativeLookahead(fence_ahead));
    let any_char = b.add(ParserKind::RegExp(Regex::new(r"(?s).").unwrap()));
    let body_char = b.add(ParserKind::Series {
        children: vec![not_fence_ahead, any_char],
        mandatory: usize::MAX,
    });
    let body = b.add_named("body", ParserKind::ZeroOrMore(body_char))?;

    let close = b.add(ParserKind::Pop {
        name: "fence".into(),
        counterpart: None,
    });

    let codeblock = b.add_named(
        "codeblock",
        ParserKind::Series {
            children: vec![delim, body, close],
            mandatory: usize::MAX,
        },
    )?;

    b.build(codeblock)
}
