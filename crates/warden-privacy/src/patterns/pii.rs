use regex::Regex;
use std::sync::LazyLock;

use super::NamedPattern;

macro_rules! pii_pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// ── SSN ────────────────────────────────────────────────────────────────────
pii_pattern!(RE_SSN, r"\b\d{3}-\d{2}-\d{4}\b");

// ── Card number (16 contiguous digits) ─────────────────────────────────────
pii_pattern!(RE_CARD_NUMBER, r"\b\d{16}\b");

// ── Email ──────────────────────────────────────────────────────────────────
pii_pattern!(
    RE_EMAIL,
    r"\b[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}\b"
);

pub fn all_patterns() -> Vec<NamedPattern> {
    vec![
        NamedPattern { name: "ssn", regex: &RE_SSN },
        NamedPattern { name: "card_number", regex: &RE_CARD_NUMBER },
        NamedPattern { name: "email", regex: &RE_EMAIL },
    ]
}
