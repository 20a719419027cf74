use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Page size for query-surface calls without an explicit limit. Default: 50.
    pub default_query_limit: usize,
    /// Replay the whole chain when the ledger is opened. Default: false.
    pub verify_on_open: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_query_limit: defaults::DEFAULT_LEDGER_QUERY_LIMIT,
            verify_on_open: defaults::DEFAULT_VERIFY_ON_OPEN,
        }
    }
}
