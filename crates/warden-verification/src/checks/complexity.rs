//! Cyclomatic complexity over a tree-sitter Python parse.
//!
//! Each function starts at 1 and gains one unit per branch, loop, exception
//! handler, `with`, `assert`, comprehension clause and boolean operator in
//! its own body. Nested functions are measured on their own.

use tree_sitter::{Node, Parser};

use warden_core::config::VerificationConfig;
use warden_core::errors::VerificationError;
use warden_core::models::{ComplexityMeasure, Finding, FindingCategory};

const STAGE: &str = "complexity";

const DECISION_KINDS: &[&str] = &[
    "if_statement",
    "elif_clause",
    "for_statement",
    "while_statement",
    "except_clause",
    "except_group_clause",
    "with_statement",
    "assert_statement",
    "for_in_clause",
    "if_clause",
    // `a and b and c` nests, so each node is one extra operand.
    "boolean_operator",
];

fn parse_failed(message: impl Into<String>) -> VerificationError {
    VerificationError::ParseFailed {
        stage: STAGE.to_string(),
        message: message.into(),
    }
}

/// Complexity of every function in `source`, in source order.
///
/// Fails with `ParseFailed` if the source does not parse cleanly.
pub fn measure(source: &str) -> Result<Vec<ComplexityMeasure>, VerificationError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| parse_failed(format!("failed to load grammar: {e}")))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| parse_failed("parser returned no tree"))?;
    let root = tree.root_node();
    if root.has_error() {
        let at = first_error_row(root).map(|r| r + 1).unwrap_or(1);
        return Err(parse_failed(format!("syntax error near line {at}")));
    }

    let mut measures = Vec::new();
    collect_functions(root, source.as_bytes(), &mut measures);
    Ok(measures)
}

/// Findings for functions above the configured thresholds.
pub fn check(
    source: &str,
    config: &VerificationConfig,
) -> Result<Vec<Finding>, VerificationError> {
    let findings = measure(source)?
        .into_iter()
        .filter_map(|m| {
            if m.score > config.complexity_critical_threshold {
                let message = format!(
                    "HIGH_COMPLEXITY: function `{}` has cyclomatic complexity {} (limit {})",
                    m.function, m.score, config.complexity_critical_threshold
                );
                Some(Finding::critical(FindingCategory::Complexity, message).with_complexity(m))
            } else if m.score > config.complexity_advisory_threshold {
                let message = format!(
                    "function `{}` has cyclomatic complexity {} (advisory above {})",
                    m.function, m.score, config.complexity_advisory_threshold
                );
                Some(Finding::advisory(FindingCategory::Complexity, message).with_complexity(m))
            } else {
                None
            }
        })
        .collect();
    Ok(findings)
}

fn collect_functions(node: Node, source: &[u8], out: &mut Vec<ComplexityMeasure>) {
    if node.kind() == "function_definition" {
        let function = node
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source).ok())
            .unwrap_or("<anonymous>")
            .to_string();
        let score = 1 + node
            .child_by_field_name("body")
            .map(count_decisions)
            .unwrap_or(0);
        out.push(ComplexityMeasure {
            function,
            score,
            line: node.start_position().row + 1,
        });
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect_functions(child, source, out);
        }
    }
}

fn count_decisions(node: Node) -> u32 {
    let mut total = 0;
    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else { continue };
        if child.kind() == "function_definition" {
            continue;
        }
        if DECISION_KINDS.contains(&child.kind()) {
            total += 1;
        }
        total += count_decisions(child);
    }
    total
}

fn first_error_row(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row);
    }
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .find_map(first_error_row)
}
