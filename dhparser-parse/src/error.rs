/*!
Errors that can arise while *building* a [`crate::Grammar`] (as opposed to
errors recorded *during* a parse, which live on [`dhparser_syntax::RootNode`]
as [`dhparser_syntax::Error`] values instead of being returned via
`Result`).
*/

use thiserror::Error;

/// A problem with the parser graph handed to [`crate::GrammarBuilder::build`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A [`crate::kind::ParserKind::Forward`] placeholder was never given a
    /// target before the grammar was built.
    #[error("forward reference {0:?} was never resolved")]
    UnresolvedForward(crate::kind::ParserId),

    /// A rule name is empty, or begins/ends with a double underscore
    /// (reserved for internal use).
    #[error("parser name {0:?} is not a valid rule name (empty, or starts/ends with `__`)")]
    InvalidName(String),

    /// Two different parsers were registered under the same rule name.
    #[error("rule name {0:?} is already bound to a different parser")]
    DuplicateName(String),

    /// The designated root parser id does not belong to this builder.
    #[error("root parser id {0:?} is not part of this grammar")]
    UnknownRoot(crate::kind::ParserId),

    /// `Alternative` was built with an `Option`/`ZeroOrMore`-shaped direct
    /// child, which can never fail and so makes every later sibling
    /// unreachable.
    #[error("alternative has a direct child ({0:?}) that can never fail, making later branches unreachable")]
    RedundantAlternative(crate::kind::ParserId),
}

/// Checks whether `name` is an acceptable rule name: non-empty, and not
/// preceded or succeeded by a double underscore (reserved for internal
/// use).
pub fn sane_parser_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with("__") && !name.ends_with("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sane_names() {
        assert!(sane_parser_name("expr"));
        assert!(sane_parser_name("_anon"));
        assert!(!sane_parser_name(""));
        assert!(!sane_parser_name("__reserved"));
        assert!(!sane_parser_name("reserved__"));
    }
}
