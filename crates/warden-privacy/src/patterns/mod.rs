pub mod pii;
pub mod secrets;

use regex::Regex;
use std::sync::LazyLock;

/// A named, lazily compiled detection pattern.
pub struct NamedPattern {
    pub name: &'static str,
    pub regex: &'static LazyLock<Option<Regex>>,
}

/// One pattern hit in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub category: &'static str,
    pub name: &'static str,
    /// Byte offsets into the scanned text.
    pub start: usize,
    pub end: usize,
    /// 1-based line of `start`.
    pub line: usize,
}

/// Run `patterns` against `text`, returning matches sorted by start
/// position (descending) with overlaps removed.
pub fn scan(text: &str, category: &'static str, patterns: &[NamedPattern]) -> Vec<PatternMatch> {
    let mut matches = Vec::new();
    for pat in patterns {
        let Some(re) = pat.regex.as_ref() else { continue };
        for m in re.find_iter(text) {
            matches.push(PatternMatch {
                category,
                name: pat.name,
                start: m.start(),
                end: m.end(),
                line: line_of(text, m.start()),
            });
        }
    }
    matches.sort_by(|a, b| b.start.cmp(&a.start));
    dedup_overlapping(&mut matches);
    matches
}

/// 1-based line number of a byte offset.
pub fn line_of(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset.min(text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Remove overlapping matches, keeping the longer (more specific) one.
fn dedup_overlapping(matches: &mut Vec<PatternMatch>) {
    let mut i = 0;
    while i + 1 < matches.len() {
        let current_len = matches[i].end - matches[i].start;
        let next_len = matches[i + 1].end - matches[i + 1].start;

        // Sorted desc by start, so next.start <= current.start.
        if matches[i + 1].end > matches[i].start {
            if next_len > current_len {
                matches.remove(i);
            } else {
                matches.remove(i + 1);
            }
        } else {
            i += 1;
        }
    }
}
