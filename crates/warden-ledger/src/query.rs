//! Read-only query builder for dashboards and CLIs.

use warden_core::models::EventType;

/// Filtered ledger listing. Descending by sequence id unless [`ascending`](Self::ascending).
///
/// ```
/// use warden_core::models::EventType;
/// use warden_ledger::LedgerQuery;
///
/// let q = LedgerQuery::new().event_type(EventType::AuditFail).limit(10);
/// assert_eq!(q.limit_or(50), 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerQuery {
    pub(crate) event_type: Option<EventType>,
    pub(crate) after: Option<i64>,
    pub(crate) limit: Option<usize>,
    pub(crate) ascending: bool,
}

impl LedgerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    /// Only entries with a sequence id greater than `entry_id`.
    pub fn after(mut self, entry_id: i64) -> Self {
        self.after = Some(entry_id);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn ascending(mut self) -> Self {
        self.ascending = true;
        self
    }

    /// The explicit limit, or `default` when none was set.
    pub fn limit_or(&self, default: usize) -> usize {
        self.limit.unwrap_or(default)
    }
}
