//! Risk classification from path and content patterns.

use regex::Regex;
use std::sync::LazyLock;

use warden_core::models::RiskGrade;

macro_rules! risk_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

/// High-sensitivity area that forces L3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskCategory {
    Authentication,
    Payments,
    Cryptography,
    SchemaMutation,
    PrivilegedOperation,
}

impl RiskCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Payments => "payments",
            Self::Cryptography => "cryptography",
            Self::SchemaMutation => "schema_mutation",
            Self::PrivilegedOperation => "privileged_operation",
        }
    }
}

/// Path fragments, matched case-insensitively as substrings.
const PATH_PATTERNS: &[(&str, RiskCategory)] = &[
    ("auth", RiskCategory::Authentication),
    ("login", RiskCategory::Authentication),
    ("password", RiskCategory::Authentication),
    ("credential", RiskCategory::Authentication),
    ("payment", RiskCategory::Payments),
    ("billing", RiskCategory::Payments),
    ("finance", RiskCategory::Payments),
    ("encrypt", RiskCategory::Cryptography),
    ("decrypt", RiskCategory::Cryptography),
    ("key", RiskCategory::Cryptography),
    ("secret", RiskCategory::Cryptography),
    ("migration", RiskCategory::SchemaMutation),
    ("schema", RiskCategory::SchemaMutation),
    ("database", RiskCategory::SchemaMutation),
    ("admin", RiskCategory::PrivilegedOperation),
    ("root", RiskCategory::PrivilegedOperation),
    ("sudo", RiskCategory::PrivilegedOperation),
];

risk_pattern!(RE_AUTH_DEF, r"(?i)def\s+(?:authenticate|authorize)");
risk_pattern!(RE_DDL, r"(?i)(?:CREATE|ALTER|DROP)\s+TABLE");
// Word-bounded so identifiers like `conversation` do not read as RSA.
risk_pattern!(RE_CRYPTO, r"(?i)\b(?:AES|RSA|SHA256|bcrypt|argon2)\b");

fn content_patterns() -> [(&'static LazyLock<Option<Regex>>, RiskCategory); 3] {
    [
        (&RE_AUTH_DEF, RiskCategory::Authentication),
        (&RE_DDL, RiskCategory::SchemaMutation),
        (&RE_CRYPTO, RiskCategory::Cryptography),
    ]
}

/// Grade plus what triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskClassification {
    pub grade: RiskGrade,
    pub category: Option<RiskCategory>,
    /// The path fragment or content text that matched.
    pub matched: Option<String>,
}

/// Pure, deterministic risk classifier over a fixed pattern table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskClassifier;

impl RiskClassifier {
    /// Any sensitive path or content match is L3; other non-blank content is
    /// L2; blank content is L1.
    ///
    /// ```
    /// use warden_core::models::RiskGrade;
    /// use warden_verification::RiskClassifier;
    ///
    /// let c = RiskClassifier;
    /// assert_eq!(c.classify("auth/login.py", "x = 1").grade, RiskGrade::L3);
    /// assert_eq!(c.classify("util/math.py", "x = 1").grade, RiskGrade::L2);
    /// assert_eq!(c.classify("util/math.py", "  \n").grade, RiskGrade::L1);
    /// ```
    pub fn classify(&self, path_hint: &str, content: &str) -> RiskClassification {
        let path = path_hint.to_lowercase();
        if let Some((fragment, category)) = PATH_PATTERNS.iter().find(|(f, _)| path.contains(f)) {
            return RiskClassification {
                grade: RiskGrade::L3,
                category: Some(*category),
                matched: Some((*fragment).to_string()),
            };
        }

        for (pattern, category) in content_patterns() {
            let Some(re) = pattern.as_ref() else { continue };
            if let Some(m) = re.find(content) {
                return RiskClassification {
                    grade: RiskGrade::L3,
                    category: Some(category),
                    matched: Some(m.as_str().to_string()),
                };
            }
        }

        let grade = if content.trim().is_empty() {
            RiskGrade::L1
        } else {
            RiskGrade::L2
        };
        RiskClassification {
            grade,
            category: None,
            matched: None,
        }
    }
}
