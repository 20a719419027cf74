//! Individual pipeline checks. Each returns findings in source order; the
//! pipeline decides which run for a given grade.

use regex::Regex;
use std::sync::LazyLock;

/// A lazily compiled check pattern. A pattern that fails to compile
/// matches nothing.
pub(crate) type LazyPattern = LazyLock<Option<Regex>>;

macro_rules! check_pattern {
    ($name:ident, $regex_str:expr) => {
        pub(crate) static $name: $crate::checks::LazyPattern =
            std::sync::LazyLock::new(|| regex::Regex::new($regex_str).ok());
    };
}
pub(crate) use check_pattern;

pub mod citation;
pub mod complexity;
pub mod dangerous_calls;
pub mod heuristics;
pub mod pii;
pub mod quote_context;
pub mod secrets;

/// 1-based line of a byte offset.
pub(crate) fn line_of(text: &str, offset: usize) -> usize {
    warden_privacy::patterns::line_of(text, offset)
}
