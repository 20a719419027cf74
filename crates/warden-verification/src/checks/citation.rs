//! Citation depth: how many layers of "X said that Y said" a claim leans on.

use warden_core::models::{Finding, FindingCategory};

use super::{check_pattern, LazyPattern};

check_pattern!(RE_WHO_CITED, r"(?i)according to .+? who cited");
check_pattern!(RE_QUOTED_IN, r"(?i)as quoted in .+? from");
check_pattern!(RE_TRIPLE_QUOTE, r#"""".+?""""#);

fn markers() -> [&'static LazyPattern; 3] {
    [&RE_WHO_CITED, &RE_QUOTED_IN, &RE_TRIPLE_QUOTE]
}

/// Number of transitive citation markers in `text`.
///
/// ```
/// use warden_verification::checks::citation::depth;
///
/// assert_eq!(depth("plain text"), 0);
/// assert_eq!(depth("According to Ada who cited Alan."), 1);
/// ```
pub fn depth(text: &str) -> u32 {
    markers()
        .iter()
        .filter_map(|p| p.as_ref())
        .map(|re| re.find_iter(text).count() as u32)
        .sum()
}

/// Critical when the depth exceeds `max_depth`.
pub fn check(text: &str, max_depth: u32) -> Vec<Finding> {
    let depth = depth(text);
    if depth > max_depth {
        vec![Finding::critical(
            FindingCategory::CitationDepth,
            format!("Citation depth {depth} exceeds maximum of {max_depth}"),
        )]
    } else {
        Vec::new()
    }
}
