//! AuditVerdict and the findings that drive it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RiskGrade;

wire_enum! {
    /// Outcome of a verification call.
    pub enum Verdict {
        Pass => "PASS",
        Fail => "FAIL",
        NeedsHumanReview => "NEEDS_HUMAN_REVIEW",
    }
}

wire_enum! {
    /// Critical findings fail the artifact; advisory findings never do.
    pub enum Severity {
        Critical => "CRITICAL",
        Advisory => "ADVISORY",
    }
}

wire_enum! {
    /// Which check produced a finding.
    pub enum FindingCategory {
        Secret => "SECRET",
        DangerousCall => "DANGEROUS_CALL",
        Pii => "PII",
        Complexity => "COMPLEXITY",
        CitationDepth => "CITATION_DEPTH",
        MissingContext => "MISSING_CONTEXT",
        FormalViolation => "FORMAL_VIOLATION",
        Heuristic => "HEURISTIC",
        VerifierFallback => "VERIFIER_FALLBACK",
        SourceCredibility => "SOURCE_CREDIBILITY",
        SentinelFallback => "SENTINEL_FALLBACK",
    }
}

/// Cyclomatic complexity measured for one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityMeasure {
    pub function: String,
    pub score: u32,
    pub line: usize,
}

/// One observation produced by a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub severity: Severity,
    pub message: String,
    /// 1-based source line, when the check can locate one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Set only by the complexity check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ComplexityMeasure>,
}

impl Finding {
    pub fn critical(category: FindingCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            severity: Severity::Critical,
            message: message.into(),
            line: None,
            complexity: None,
        }
    }

    pub fn advisory(category: FindingCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            severity: Severity::Advisory,
            message: message.into(),
            line: None,
            complexity: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_complexity(mut self, measure: ComplexityMeasure) -> Self {
        self.line = Some(measure.line);
        self.complexity = Some(measure);
        self
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// Result of one `audit` call. Never mutated after it is returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditVerdict {
    pub artifact_id: String,
    pub path_hint: String,
    pub risk_grade: RiskGrade,
    pub verdict: Verdict,
    pub rationale: String,
    /// In the order the checks ran.
    pub findings: Vec<Finding>,
    pub latency_ms: u64,
    pub pii_redacted: bool,
    pub requires_approval: bool,
    pub audited_at: DateTime<Utc>,
}

impl AuditVerdict {
    pub fn critical_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_critical())
    }

    pub fn has_critical(&self) -> bool {
        self.findings.iter().any(Finding::is_critical)
    }

    /// Highest complexity measured across all functions, if the stage ran.
    pub fn max_complexity(&self) -> Option<u32> {
        self.findings
            .iter()
            .filter_map(|f| f.complexity.as_ref().map(|c| c.score))
            .max()
    }
}
