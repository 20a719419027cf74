use serde::{Deserialize, Serialize};

use super::defaults;

/// Thresholds for the verification pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Function complexity above this is critical. Default: 20.
    pub complexity_critical_threshold: u32,
    /// Function complexity above this is advisory. Default: 10.
    pub complexity_advisory_threshold: u32,
    /// Citation nesting deeper than this is critical. Default: 2.
    pub max_citation_depth: u32,
    /// Shortest quoted span that needs context. Default: 10.
    pub quote_min_length: usize,
    /// Surrounding text required on at least one side of a quote. Default: 50.
    pub quote_context_min_chars: usize,
    /// How far either side of a quote to look for context. Default: 200.
    pub quote_context_window: usize,
    /// Per-call bound on external verifiers. Default: 30000.
    pub verifier_timeout_ms: u64,
    /// Treat eval/exec/os.system/pickle.loads as critical in L3 artifacts. Default: true.
    pub dangerous_calls_critical_at_l3: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            complexity_critical_threshold: defaults::DEFAULT_COMPLEXITY_CRITICAL,
            complexity_advisory_threshold: defaults::DEFAULT_COMPLEXITY_ADVISORY,
            max_citation_depth: defaults::DEFAULT_MAX_CITATION_DEPTH,
            quote_min_length: defaults::DEFAULT_QUOTE_MIN_LENGTH,
            quote_context_min_chars: defaults::DEFAULT_QUOTE_CONTEXT_MIN_CHARS,
            quote_context_window: defaults::DEFAULT_QUOTE_CONTEXT_WINDOW,
            verifier_timeout_ms: defaults::DEFAULT_VERIFIER_TIMEOUT_MS,
            dangerous_calls_critical_at_l3: true,
        }
    }
}
