use regex::Regex;
use std::sync::LazyLock;

use super::NamedPattern;

macro_rules! secret_pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// ── Payment provider keys ──────────────────────────────────────────────────
secret_pattern!(RE_STRIPE_LIVE, r"sk_live_[0-9a-zA-Z]{20,}");
secret_pattern!(RE_STRIPE_TEST, r"sk_test_[0-9a-zA-Z]{20,}");

// ── Cloud / SCM tokens ─────────────────────────────────────────────────────
secret_pattern!(RE_GOOGLE_API_KEY, r"AIza[0-9A-Za-z\-_]{35}");
secret_pattern!(RE_GITHUB_PAT, r"ghp_[0-9a-zA-Z]{36}");
secret_pattern!(
    RE_AWS_ACCESS_KEY_ID,
    r#"aws_access_key_id\s*=\s*['"][A-Z0-9]{20}['"]"#
);
secret_pattern!(RE_AWS_ACCESS_KEY, r"\bAKIA[0-9A-Z]{16}\b");

// ── Private keys (PEM) ─────────────────────────────────────────────────────
secret_pattern!(
    RE_PRIVATE_KEY,
    r"-----BEGIN (?:RSA |EC |DSA |OPENSSH )?PRIVATE KEY-----"
);

// ── Credentials in assignments ─────────────────────────────────────────────
secret_pattern!(RE_PASSWORD_ASSIGN, r#"(?i)password\s*=\s*['"][^'"]{4,}['"]"#);
secret_pattern!(RE_API_KEY_ASSIGN, r#"(?i)api_key\s*=\s*['"][^'"]{8,}['"]"#);

/// All secret patterns, most specific first.
pub fn all_patterns() -> Vec<NamedPattern> {
    vec![
        NamedPattern { name: "stripe_live_key", regex: &RE_STRIPE_LIVE },
        NamedPattern { name: "stripe_test_key", regex: &RE_STRIPE_TEST },
        NamedPattern { name: "google_api_key", regex: &RE_GOOGLE_API_KEY },
        NamedPattern { name: "github_pat", regex: &RE_GITHUB_PAT },
        NamedPattern { name: "aws_access_key_id", regex: &RE_AWS_ACCESS_KEY_ID },
        NamedPattern { name: "aws_access_key", regex: &RE_AWS_ACCESS_KEY },
        NamedPattern { name: "private_key", regex: &RE_PRIVATE_KEY },
        NamedPattern { name: "password_assignment", regex: &RE_PASSWORD_ASSIGN },
        NamedPattern { name: "api_key_assignment", regex: &RE_API_KEY_ASSIGN },
    ]
}
