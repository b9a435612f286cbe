//! End-to-end tests for six concrete scenarios. These
//! exercise the full [`dhparser::parse`] entry point against the two demo
//! grammars under `demos/`, rather than the crate-internal unit tests in
//! `dhparser-parse`/`dhparser-stringview` that already cover the same
//! mechanisms (left recursion, capture/pop, mandatory continuation, resume
//! rules, empty-match termination, `StringView::find`) in isolation.

use cool_asserts::assert_matches;
use dhparser::{
    to_sexpr, GrammarBuilder, ParserConfig, ParserKind, Start, MANDATORY_CONTINUATION,
    RESUME_NOTICE, RULE_RESUME_ERROR,
};
use regex::Regex;

/// Scenario 1: arithmetic with direct left recursion at two precedence
/// levels. `5 + 3 * 4` parses to an `expr` whose top level is
/// `expr("5"), "+", term("3 * 4")`, with no errors and a verbatim
/// round-trip.
#[test]
fn arithmetic_with_direct_left_recursion() {
    let grammar = dhparser_test::arithmetic::grammar().unwrap();
    let root = dhparser::parse(&grammar, "5 + 3 * 4", Start::Root, &ParserConfig::default(), true)
        .unwrap();

    assert!(!root.has_errors(), "errors: {:?}", root.errors_sorted());
    assert_eq!(root.to_text(), "5 + 3 * 4");
    assert_eq!(root.name(), "expr");

    let top = root.children();
    assert_eq!(top.len(), 3);
    assert_eq!(top[0].name(), "expr");
    assert_eq!(top[0].to_text(), "5 ");
    assert_eq!(top[2].name(), "term");
    assert_eq!(top[2].to_text(), "3 * 4");

    assert_eq!(root.find(|n| n.name() == "number").len(), 3);
}

/// Scenario 1 (associativity check): a longer left-recursive chain stays
/// fully left-associative and still round-trips verbatim.
#[test]
fn arithmetic_handles_a_longer_left_recursive_chain() {
    let grammar = dhparser_test::arithmetic::grammar().unwrap();
    let root = dhparser::parse(
        &grammar,
        "1 + 2 - 3 + 4",
        Start::Root,
        &ParserConfig::default(),
        true,
    )
    .unwrap();

    assert!(!root.has_errors());
    assert_eq!(root.to_text(), "1 + 2 - 3 + 4");
    assert_eq!(root.find(|n| n.name() == "number").len(), 4);
}

/// Scenario 2: capture/pop context-sensitivity over a variable-length
/// backtick fence. A two-backtick run inside the body must not be
/// mistaken for the three-backtick closing fence.
#[test]
fn codeblock_delimiter_length_is_captured_and_matched() {
    let grammar = dhparser_test::codeblock::grammar().unwrap();
    let input = "```code `` mid``` end";
    let root = dhparser::parse(&grammar, input, Start::Root, &ParserConfig::default(), true)
        .unwrap();

    assert!(!root.has_errors(), "errors: {:?}", root.errors_sorted());
    assert_eq!(root.name(), "codeblock");

    let body = root.pick("body").expect("body node present");
    assert_eq!(body.to_text(), "code `` mid");
}

/// Scenario 2 (mismatch case): a closing fence shorter than the opening
/// one never satisfies `Pop`, so the parse cannot consume the whole input.
#[test]
fn codeblock_rejects_a_mismatched_closing_fence() {
    let grammar = dhparser_test::codeblock::grammar().unwrap();
    let root =
        dhparser::parse(&grammar, "```abc``", Start::Root, &ParserConfig::default(), true)
            .unwrap();

    assert!(root.has_errors());
}

/// Scenario 3: mandatory continuation (`§`) with a skip rule recovers at
/// the next sync point and records exactly one `MANDATORY_CONTINUATION`
/// error, while still consuming the entire input.
#[test]
fn mandatory_continuation_recovers_via_skip_rule() {
    let mut b = GrammarBuilder::new();
    let a = b.add(ParserKind::Literal { text: "A".into(), literal_ws: None });
    let c = b.add(ParserKind::Literal { text: "B".into(), literal_ws: None });
    let d = b.add(ParserKind::Literal { text: "C".into(), literal_ws: None });
    let e = b.add(ParserKind::Literal { text: "D".into(), literal_ws: None });
    let series = b.add_named(
        "series",
        ParserKind::Series {
            children: vec![a, c, d, e],
            mandatory: 2,
        },
    )
    .unwrap();
    b.set_skip_rules(series, vec![Regex::new("D").unwrap()]);
    let grammar = b.build(series).unwrap();

    let root = dhparser::parse(&grammar, "AB_D", Start::Root, &ParserConfig::default(), true)
        .unwrap();

    let errors = root.errors_sorted();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, MANDATORY_CONTINUATION);
    assert_eq!(errors[0].pos, 2);
    assert_eq!(root.to_text(), "AB_D");
}

/// Scenario 4: a resume rule recovers from a rule that fails outright
/// (not a `§` site), producing exactly one error and one `RESUME_NOTICE`,
/// while well-formed siblings either side of the failure still parse.
#[test]
fn resume_rule_recovers_a_malformed_rule_between_well_formed_siblings() {
    let mut b = GrammarBuilder::new();

    let a1 = b.add(ParserKind::Literal { text: "a".into(), literal_ws: None });
    let b1 = b.add(ParserKind::Literal { text: "b".into(), literal_ws: None });
    let c1 = b.add(ParserKind::Literal { text: "c".into(), literal_ws: None });
    let alpha_head = b.add(ParserKind::Literal { text: "ALPHA ".into(), literal_ws: None });
    let alpha_body = b.add(ParserKind::Series {
        children: vec![a1, b1, c1],
        mandatory: usize::MAX,
    });
    let alpha = b
        .add_named(
            "alpha",
            ParserKind::Series {
                children: vec![alpha_head, alpha_body],
                mandatory: usize::MAX,
            },
        )
        .unwrap();
    b.set_resume_rules(alpha, vec![Regex::new("BETA").unwrap()]);

    let beta = b
        .add_named("beta", ParserKind::Literal { text: "BETA bac ".into(), literal_ws: None })
        .unwrap();
    let gamma = b
        .add_named("gamma", ParserKind::Literal { text: "GAMMA cab .".into(), literal_ws: None })
        .unwrap();

    let root_series = b.add(ParserKind::Series {
        children: vec![alpha, beta, gamma],
        mandatory: usize::MAX,
    });
    let grammar = b.build(root_series).unwrap();

    let config = ParserConfig {
        resume_notices: true,
        ..ParserConfig::default()
    };
    let root = dhparser::parse(
        &grammar,
        "ALPHA acb BETA bac GAMMA cab .",
        Start::Root,
        &config,
        true,
    )
    .unwrap();

    let errors = root.errors_sorted();
    assert_eq!(errors.iter().filter(|e| e.code == RULE_RESUME_ERROR).count(), 1);
    assert_eq!(errors.iter().filter(|e| e.code == RESUME_NOTICE).count(), 1);
    assert_eq!(root.to_text(), "ALPHA acb BETA bac GAMMA cab .");
    assert!(root.pick("beta").is_some());
    assert!(root.pick("gamma").is_some());
}

/// Scenario 5: a repetition of an always-matching empty regex does not
/// loop forever, and produces no children (every iteration is empty, so
/// the loop stops after the first).
#[test]
fn empty_match_repetition_terminates() {
    let mut b = GrammarBuilder::new();
    let empty_re = b.add(ParserKind::RegExp(Regex::new("").unwrap()));
    let rep = b.add_named("loop", ParserKind::ZeroOrMore(empty_re)).unwrap();
    let grammar = b.build(rep).unwrap();

    let root = dhparser::parse(&grammar, " ", Start::Root, &ParserConfig::default(), false)
        .unwrap();

    assert!(!root.has_errors());
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.children()[0].to_text(), "");
}

/// A bare number collapses all the way up through `term`/`expr`'s
/// single-child alternative with no left-recursive growth, leaving a lone
/// leaf tagged with the outermost rule's name, snapshotted rather than
/// spelled out inline since the S-expression form is the tree's natural
/// inspection format.
#[test]
fn arithmetic_sexpr_of_a_bare_number() {
    let grammar = dhparser_test::arithmetic::grammar().unwrap();
    let root = dhparser::parse(&grammar, "7", Start::Root, &ParserConfig::default(), true)
        .unwrap();

    assert!(!root.has_errors());
    insta::assert_snapshot!(to_sexpr(&root), @r###"(expr "7")"###);
}

/// Scenario 6: `StringView::find` agrees with plain buffer-level
/// `str::find` restricted to the same bounds, offset back to being
/// view-relative: checked here through the facade re-export boundary
/// rather than `dhparser-stringview`'s own unit test, to confirm the type
/// is actually reachable from a driver crate.
#[test]
fn stringview_find_matches_bounded_buffer_search() {
    use dhparser::prelude::StringView;

    let text = "abc needle def needle ghi";
    for (a, b) in [(0, text.len()), (4, 22), (10, 20)] {
        let view = StringView::new(text).sub_view(a as isize, b as isize);
        assert_matches!(
            (view.find("needle"), text[a..b].find("needle")),
            (got, want) if got == want
        );
    }
}
