//! Quoted spans must come with enough surrounding text to be checked.

use warden_core::config::VerificationConfig;
use warden_core::models::{Finding, FindingCategory};

use super::{check_pattern, line_of};

check_pattern!(RE_QUOTED_SPAN, r#""([^"]+)""#);

/// Last `n` characters of `s`.
fn tail_chars(s: &str, n: usize) -> &str {
    match s.char_indices().rev().nth(n.saturating_sub(1)) {
        Some((idx, _)) if n > 0 => &s[idx..],
        _ if n == 0 => "",
        _ => s,
    }
}

/// First `n` characters of `s`.
fn head_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Critical on the first quote of at least `quote_min_length` characters
/// whose context window holds fewer than `quote_context_min_chars`
/// non-blank characters on both sides.
pub fn check(text: &str, config: &VerificationConfig) -> Vec<Finding> {
    let Some(re) = RE_QUOTED_SPAN.as_ref() else {
        return Vec::new();
    };
    for caps in re.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if inner.as_str().chars().count() < config.quote_min_length {
            continue;
        }
        // Triple-quoted literals are docstrings, not quotations.
        if text[..whole.start()].ends_with("\"\"") && text[whole.end()..].starts_with("\"\"") {
            continue;
        }
        let before = tail_chars(&text[..whole.start()], config.quote_context_window);
        let after = head_chars(&text[whole.end()..], config.quote_context_window);
        let before_len = before.trim().chars().count();
        let after_len = after.trim().chars().count();
        if before_len < config.quote_context_min_chars && after_len < config.quote_context_min_chars {
            let preview = head_chars(inner.as_str(), 40);
            return vec![Finding::critical(
                FindingCategory::MissingContext,
                format!(
                    "MISSING_CONTEXT: quote \"{preview}\" has {before_len} chars before and {after_len} after (need {})",
                    config.quote_context_min_chars
                ),
            )
            .at_line(line_of(text, whole.start()))];
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_windows_respect_utf8_boundaries() {
        assert_eq!(tail_chars("héllo", 3), "llo");
        assert_eq!(tail_chars("hé", 5), "hé");
        assert_eq!(tail_chars("abc", 0), "");
        assert_eq!(head_chars("éa", 1), "é");
        assert_eq!(head_chars("ab", 9), "ab");
    }
}
