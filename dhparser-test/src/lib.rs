/*!
Demo grammars shared between [`dhparser-test`]'s own end-to-end tests and
its demo binary (`src/main.rs`). The grammars themselves live under
`demos/` at the workspace root rather than under `src/`, so a reader can
find "the arithmetic grammar" without first knowing which crate's tests
happen to use it; this crate just `#[path]`-includes them.
*/

#![deny(missing_docs)]

/// The left-recursive arithmetic grammar.
#[path = "../../demos/arithmetic/mod.rs"]
pub mod arithmetic;

/// The capture/pop backtick-fence grammar.
#[path = "../../demos/codeblock/mod.rs"]
pub mod codeblock;
