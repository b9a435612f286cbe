//! A small, hand-built arithmetic grammar exercising direct left recursion
//! at two precedence levels:
//!
//! ```text
//! expr   = expr ("+"|"-") term | term
//! term   = term ("*"|"/") factor | factor
//! factor = /[0-9]+/
//! ```
//!
//! Built with [`dhparser::GrammarBuilder`] directly rather than generated
//! from an EBNF source, since EBNF compilation is out of scope here.
//! `factor` and the digit regex are the same rule here, there is no
//! separate tokenizing step to distinguish them.

use dhparser::{BuildError, Grammar, GrammarBuilder, ParserKind};
use regex::Regex;

/// Build the arithmetic grammar, rooted at `expr`.
pub fn grammar() -> Result<Grammar, BuildError> {
    let mut b = GrammarBuilder::new();

    let ws = b.add(ParserKind::Whitespace(Regex::new(r"[ \t]*").unwrap()));
    let op = |b: &mut GrammarBuilder, text: &str| {
        b.add(ParserKind::Literal {
            text: text.into(),
            literal_ws: Some(ws),
        })
    };

    // A leading-whitespace-skip wrapper so a number need not start exactly
    // at the beginning of a series; this demo only ever needs it at the
    // very front of the input, but wiring it into the number rule itself
    // keeps every call site uniform.
    let digits = b.add(ParserKind::RegExp(Regex::new(r"[0-9]+[ \t]*").unwrap()));
    let number = b.add_named("number", ParserKind::Synonym(digits))?;

    let plus = op(&mut b, "+");
    let minus = op(&mut b, "-");
    let star = op(&mut b, "*");
    let slash = op(&mut b, "/");

    let add_op = b.add(ParserKind::Alternative(vec![plus, minus]));
    let mul_op = b.add(ParserKind::Alternative(vec![star, slash]));

    // term = term mul_op number | number
    let term_fwd = b.forward();
    let term_series = b.add(ParserKind::Series {
        children: vec![term_fwd, mul_op, number],
        mandatory: usize::MAX,
    });
    let term = b.add_named("term", ParserKind::Alternative(vec![term_series, number]))?;
    b.resolve_forward(term_fwd, term);

    // expr = expr add_op term | term
    let expr_fwd = b.forward();
    let expr_series = b.add(ParserKind::Series {
        children: vec![expr_fwd, add_op, term],
        mandatory: usize::MAX,
    });
    let expr = b.add_named("expr", ParserKind::Alternative(vec![expr_series, term]))?;
    b.resolve_forward(expr_fwd, expr);

    b.build(expr)
}
