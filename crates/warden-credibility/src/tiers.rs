//! Provenance tier classification.

use warden_core::models::SourceTier;

const T1_PATTERNS: &[&str] = &[
    "rfc-editor.org",
    "ieee.org",
    "iso.org",
    "w3.org",
    "ietf.org",
    ".gov",
    "arxiv.org/abs",
    "doi.org",
];

const T2_PATTERNS: &[&str] = &[
    "owasp.org",
    "docs.python.org",
    "docs.microsoft.com",
    "developer.mozilla.org",
    "kubernetes.io/docs",
    "docs.aws.amazon.com",
    "cloud.google.com/docs",
];

const T3_PATTERNS: &[&str] = &[
    "github.com",
    "medium.com",
    "dev.to",
    "hackernews",
    "techcrunch.com",
    "arstechnica.com",
    "wired.com",
];

/// Tier from ordered substring lists over the lowercased URL. T4 when
/// nothing matches.
///
/// ```
/// use warden_core::models::SourceTier;
/// use warden_credibility::classify_tier;
///
/// assert_eq!(classify_tier("https://www.rfc-editor.org/rfc/rfc9110"), SourceTier::T1);
/// assert_eq!(classify_tier("https://someone.blog/post"), SourceTier::T4);
/// ```
pub fn classify_tier(url: &str) -> SourceTier {
    let url = url.to_lowercase();
    let tiers = [
        (T1_PATTERNS, SourceTier::T1),
        (T2_PATTERNS, SourceTier::T2),
        (T3_PATTERNS, SourceTier::T3),
    ];
    tiers
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| url.contains(p)))
        .map(|(_, tier)| *tier)
        .unwrap_or(SourceTier::T4)
}

/// Host part of a URL, lowercased and without port. Falls back to the first
/// 50 characters when the URL has no recognizable host.
pub fn domain_of(url: &str) -> String {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('@')
        .next()
        .unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();
    if host.is_empty() {
        url.chars().take(50).collect()
    } else {
        host.to_lowercase()
    }
}

/// First 16 hex characters of `blake3(url)`.
pub fn source_id(url: &str) -> String {
    let hex = blake3::hash(url.as_bytes()).to_hex();
    hex.as_str()[..16].to_string()
}
