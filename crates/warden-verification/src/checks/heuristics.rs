//! Pattern scanner used at L3 when no external verifier gives an answer.
//!
//! Division by zero and null dereference are critical; buffer and overflow
//! patterns are advisory.

use warden_core::models::{Finding, FindingCategory, Severity};

use super::{check_pattern, line_of, LazyPattern};

check_pattern!(RE_DIV_ZERO, r"(?:^|[^/])/\s*0(?:[^.\w]|$)");
check_pattern!(RE_DIV_ZERO_PAREN, r"/\s*\(\s*0\s*\)");
check_pattern!(RE_MOD_ZERO, r"%\s*0(?:[^.\w]|$)");

check_pattern!(RE_STRCPY, r"(?i)\bstrcpy\s*\(");
check_pattern!(RE_STRCAT, r"(?i)\bstrcat\s*\(");
check_pattern!(RE_GETS, r"(?i)\bgets\s*\(");
check_pattern!(RE_SPRINTF, r"(?i)\bsprintf\s*\(");
check_pattern!(RE_FIXED_BUFFER, r"\[\s*\d{4,}\s*\]");

check_pattern!(RE_NULL_DEREF, r"(?i)\*\s*NULL\b");
check_pattern!(RE_NULL_ARROW, r"(?i)\bNULL\s*->");

check_pattern!(RE_INT_MAX_PLUS, r"\bINT_MAX\s*\+");
check_pattern!(RE_PLUS_INT_MAX, r"\+\s*INT_MAX\b");
check_pattern!(RE_UINT_MAX_PLUS, r"\bUINT_MAX\s*\+");

struct Heuristic {
    regex: &'static LazyPattern,
    severity: Severity,
    message: &'static str,
}

fn table() -> [Heuristic; 13] {
    use Severity::{Advisory, Critical};
    [
        Heuristic { regex: &RE_DIV_ZERO, severity: Critical, message: "Potential division by zero" },
        Heuristic { regex: &RE_DIV_ZERO_PAREN, severity: Critical, message: "Potential division by zero" },
        Heuristic { regex: &RE_MOD_ZERO, severity: Critical, message: "Potential modulo by zero" },
        Heuristic { regex: &RE_STRCPY, severity: Advisory, message: "Unbounded string copy (strcpy)" },
        Heuristic { regex: &RE_STRCAT, severity: Advisory, message: "Unbounded string concatenation (strcat)" },
        Heuristic { regex: &RE_GETS, severity: Advisory, message: "Unbounded input read (gets)" },
        Heuristic { regex: &RE_SPRINTF, severity: Advisory, message: "Unbounded formatted write (sprintf)" },
        Heuristic { regex: &RE_FIXED_BUFFER, severity: Advisory, message: "Large fixed-size buffer" },
        Heuristic { regex: &RE_NULL_DEREF, severity: Critical, message: "Potential null pointer dereference" },
        Heuristic { regex: &RE_NULL_ARROW, severity: Critical, message: "Potential null pointer dereference" },
        Heuristic { regex: &RE_INT_MAX_PLUS, severity: Advisory, message: "Potential integer overflow" },
        Heuristic { regex: &RE_PLUS_INT_MAX, severity: Advisory, message: "Potential integer overflow" },
        Heuristic { regex: &RE_UINT_MAX_PLUS, severity: Advisory, message: "Potential unsigned overflow" },
    ]
}

/// One finding per matching pattern, located at its first match.
pub fn scan(content: &str) -> Vec<Finding> {
    let mut hits: Vec<(usize, Finding)> = table()
        .iter()
        .filter_map(|h| {
            let m = h.regex.as_ref()?.find(content)?;
            let finding = match h.severity {
                Severity::Critical => Finding::critical(FindingCategory::Heuristic, h.message),
                Severity::Advisory => Finding::advisory(FindingCategory::Heuristic, h.message),
            };
            Some((m.start(), finding.at_line(line_of(content, m.start()))))
        })
        .collect();
    hits.sort_by_key(|(start, _)| *start);
    hits.into_iter().map(|(_, f)| f).collect()
}
