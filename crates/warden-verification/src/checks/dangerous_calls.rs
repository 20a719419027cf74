//! Calls that execute or deserialize untrusted input.

use warden_core::models::{Finding, FindingCategory, RiskGrade};

use super::{check_pattern, line_of, LazyPattern};

check_pattern!(RE_EVAL, r"\beval\s*\(");
check_pattern!(RE_EXEC, r"\bexec\s*\(");
check_pattern!(RE_COMPILE, r"\bcompile\s*\(");
check_pattern!(RE_OS_SYSTEM, r"\bos\.system\s*\(");
check_pattern!(RE_SUBPROCESS_CALL, r"\bsubprocess\.call\s*\(");
check_pattern!(RE_SUBPROCESS_POPEN, r"\bsubprocess\.Popen\s*\(");
check_pattern!(RE_PICKLE_LOADS, r"\bpickle\.loads\s*\(");
check_pattern!(RE_DUNDER_IMPORT, r"\b__import__\s*\(");
check_pattern!(RE_OPEN, r"\bopen\s*\(");

struct DangerousCall {
    call: &'static str,
    regex: &'static LazyPattern,
    /// Escalates to critical in L3 artifacts.
    severe: bool,
}

fn table() -> [DangerousCall; 9] {
    [
        DangerousCall { call: "eval", regex: &RE_EVAL, severe: true },
        DangerousCall { call: "exec", regex: &RE_EXEC, severe: true },
        DangerousCall { call: "compile", regex: &RE_COMPILE, severe: false },
        DangerousCall { call: "os.system", regex: &RE_OS_SYSTEM, severe: true },
        DangerousCall { call: "subprocess.call", regex: &RE_SUBPROCESS_CALL, severe: false },
        DangerousCall { call: "subprocess.Popen", regex: &RE_SUBPROCESS_POPEN, severe: false },
        DangerousCall { call: "pickle.loads", regex: &RE_PICKLE_LOADS, severe: true },
        DangerousCall { call: "__import__", regex: &RE_DUNDER_IMPORT, severe: false },
        DangerousCall { call: "open", regex: &RE_OPEN, severe: false },
    ]
}

/// One finding per distinct call, located at its first use.
///
/// Advisory unless `critical_at_l3` is set, the artifact is L3, and the call
/// is one of eval/exec/os.system/pickle.loads.
pub fn check(content: &str, grade: RiskGrade, critical_at_l3: bool) -> Vec<Finding> {
    let escalate = critical_at_l3 && grade == RiskGrade::L3;
    let mut findings: Vec<(usize, Finding)> = table()
        .iter()
        .filter_map(|entry| {
            let m = entry.regex.as_ref()?.find(content)?;
            let message = format!("Dangerous call `{}(`", entry.call);
            let finding = if escalate && entry.severe {
                Finding::critical(FindingCategory::DangerousCall, message)
            } else {
                Finding::advisory(FindingCategory::DangerousCall, message)
            };
            Some((m.start(), finding.at_line(line_of(content, m.start()))))
        })
        .collect();
    findings.sort_by_key(|(start, _)| *start);
    findings.into_iter().map(|(_, f)| f).collect()
}
