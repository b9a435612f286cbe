/*!
The error model used by both the parser (`dhparser-parse`) and the
transformation engine (`dhparser-transform`): a flat, sortable record rather
than a Rust `std::error::Error`, since an `Error` here is parse-time *data*
attached to the tree, not a failure unwound through `Result`.
*/

use std::cmp::Ordering;
use std::fmt;

/// A `§`-mandatory-continuation violation.
pub const MANDATORY_CONTINUATION: u32 = 1010;
/// A `§`-mandatory-continuation violation at end of input.
pub const MANDATORY_CONTINUATION_AT_EOF: u32 = 1011;
/// The parser could not consume the entire input (and `complete_match` was
/// requested).
pub const PARSER_STOPPED_BEFORE_END: u32 = 1040;
/// Informational marker emitted when a resume rule skips text.
pub const RESUME_NOTICE: u32 = 50;
/// A named rule failed outright and was recovered via its `@..._resume`
/// rule rather than a `§` mandatory-continuation site.
pub const RULE_RESUME_ERROR: u32 = 1020;
/// A node bore a tag the transformation engine's `forbid` transformer was
/// told to reject in this context.
pub const TRANSFORM_FORBIDDEN_TAG: u32 = 1100;
/// A node's text failed the pattern given to `assert_content`.
pub const TRANSFORM_ASSERT_CONTENT_FAILED: u32 = 1101;

/// The severity of an [`Error`]. Ordered `Warning < Error < Fatal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorLevel {
    /// A non-fatal observation; parsing succeeded regardless.
    Warning,
    /// A recorded failure; the tree may still be usable, but downstream
    /// consumers should take note.
    Error,
    /// The returned tree is unreliable; downstream consumers are expected to
    /// skip compilation entirely.
    Fatal,
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorLevel::Warning => "WARNING",
            ErrorLevel::Error => "ERROR",
            ErrorLevel::Fatal => "FATAL",
        };
        f.write_str(s)
    }
}

/// A single parse-time or transform-time error, attached to the tree rather
/// than returned via `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Error {
    /// Human-readable description.
    pub message: String,
    /// A small integer taxonomy; see the `MANDATORY_CONTINUATION` etc.
    /// constants in this module for the mandatory codes.
    pub code: u32,
    /// Severity.
    pub level: ErrorLevel,
    /// Absolute byte offset within the source text.
    pub pos: usize,
}

impl Error {
    /// Construct a new error record.
    pub fn new(message: impl Into<String>, code: u32, level: ErrorLevel, pos: usize) -> Self {
        Error {
            message: message.into(),
            code,
            level,
            pos,
        }
    }

    /// Shorthand for a `Warning`-level error.
    pub fn warning(message: impl Into<String>, code: u32, pos: usize) -> Self {
        Error::new(message, code, ErrorLevel::Warning, pos)
    }

    /// Shorthand for an `Error`-level error.
    pub fn error(message: impl Into<String>, code: u32, pos: usize) -> Self {
        Error::new(message, code, ErrorLevel::Error, pos)
    }

    /// Shorthand for a `Fatal`-level error.
    pub fn fatal(message: impl Into<String>, code: u32, pos: usize) -> Self {
        Error::new(message, code, ErrorLevel::Fatal, pos)
    }

    /// The ordering used by [`crate::RootNode::errors_sorted`]: ascending by
    /// position, then by descending severity (`FATAL` before `WARNING`
    /// within the same position), then by code.
    pub(crate) fn cmp_for_sort(&self, other: &Error) -> Ordering {
        self.pos
            .cmp(&other.pos)
            .then_with(|| other.level.cmp(&self.level))
            .then_with(|| self.code.cmp(&other.code))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}: {} (code {})",
            self.level, self.pos, self.message, self.code
        )
    }
}

impl std::error::Error for Error {}
