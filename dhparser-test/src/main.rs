//! Demo binary: parse stdin against one of the two demo grammars and print
//! the resulting tree plus any recorded errors.

use std::io::{self, Read};

use anyhow::Context;
use dhparser::{to_sexpr, ParserConfig, Start};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let grammar_name = std::env::args().nth(1).unwrap_or_else(|| "arithmetic".to_string());

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read input from stdin")?;
    let input = input.trim_end_matches('\n');

    let grammar = match grammar_name.as_str() {
        "arithmetic" => dhparser_test::arithmetic::grammar().context("building arithmetic grammar")?,
        "codeblock" => dhparser_test::codeblock::grammar().context("building codeblock grammar")?,
        other => anyhow::bail!("unknown demo grammar {other:?}; expected \"arithmetic\" or \"codeblock\""),
    };

    let root = dhparser::parse(&grammar, input, Start::Root, &ParserConfig::default(), true)
        .context("resolving parse start point")?;

    println!("{}", to_sexpr(&root));

    for error in root.errors_sorted() {
        eprintln!("{error}");
    }

    if root.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}
