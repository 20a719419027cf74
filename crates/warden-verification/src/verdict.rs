//! Verdict resolution.

use warden_core::models::{Finding, RiskGrade, Verdict};

/// Reason recorded when an L3 artifact is held for approval.
pub const L3_REVIEW_REASON: &str = "L3 artifact requires Overseer approval before commit.";

/// FAIL on any critical finding, else NEEDS_HUMAN_REVIEW when approval is
/// required, else PASS. Returns the verdict with its rationale.
///
/// ```
/// use warden_core::models::{Finding, FindingCategory, RiskGrade, Verdict};
/// use warden_verification::resolve_verdict;
///
/// let (v, why) = resolve_verdict(RiskGrade::L2, &[], false);
/// assert_eq!(v, Verdict::Pass);
/// assert_eq!(why, "All L2 checks passed.");
///
/// let bad = [Finding::critical(FindingCategory::Secret, "leaked key")];
/// assert_eq!(resolve_verdict(RiskGrade::L3, &bad, true).0, Verdict::Fail);
/// ```
pub fn resolve_verdict(
    grade: RiskGrade,
    findings: &[Finding],
    requires_approval: bool,
) -> (Verdict, String) {
    let critical: Vec<&str> = findings
        .iter()
        .filter(|f| f.is_critical())
        .map(|f| f.message.as_str())
        .collect();
    if !critical.is_empty() {
        return (Verdict::Fail, critical.join("; "));
    }
    if requires_approval {
        return (Verdict::NeedsHumanReview, L3_REVIEW_REASON.to_string());
    }
    (Verdict::Pass, format!("All {grade} checks passed."))
}
