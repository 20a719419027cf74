//! Structured log events for governance operations.
//!
//! Each function emits a `tracing` event with an `event` field naming it, so
//! JSON logs can be filtered by event kind.

/// Log an audit verdict.
pub fn verdict_issued(artifact_id: &str, risk_grade: &str, verdict: &str, latency_ms: u64) {
    tracing::info!(
        event = "verdict_issued",
        artifact_id = %artifact_id,
        risk_grade = %risk_grade,
        verdict = %verdict,
        latency_ms = latency_ms,
        "verdict issued"
    );
}

/// Log a trust score change.
pub fn trust_updated(agent_id: &str, kind: &str, old_score: f64, new_score: f64, stage: &str) {
    tracing::info!(
        event = "trust_updated",
        agent_id = %agent_id,
        kind = %kind,
        old_score = old_score,
        new_score = new_score,
        stage = %stage,
        "trust updated"
    );
}

/// Log the start of a quarantine window.
pub fn agent_quarantined(agent_id: &str, track: &str, hours: i64, reason: &str) {
    tracing::warn!(
        event = "agent_quarantined",
        agent_id = %agent_id,
        track = %track,
        hours = hours,
        reason = %reason,
        "agent quarantined"
    );
}

/// Log the end of a quarantine window.
pub fn agent_released(agent_id: &str, status: &str) {
    tracing::info!(
        event = "agent_released",
        agent_id = %agent_id,
        status = %status,
        "agent released from quarantine"
    );
}

pub fn ledger_appended(entry_id: i64, event_type: &str, entry_hash: &str) {
    tracing::debug!(
        event = "ledger_appended",
        entry_id = entry_id,
        event_type = %event_type,
        entry_hash = %entry_hash,
        "ledger entry appended"
    );
}

/// Log a completed chain replay.
pub fn chain_verified(entries_checked: u64, intact: bool) {
    tracing::info!(
        event = "chain_verified",
        entries_checked = entries_checked,
        intact = intact,
        "ledger chain verified"
    );
}

/// Log an integrity halt. Always error level.
pub fn integrity_halt(entry_id: i64, details: &str) {
    tracing::error!(
        event = "integrity_halt",
        entry_id = entry_id,
        details = %details,
        "ledger integrity violation, writes halted"
    );
}

pub fn halt_cleared(operator: &str) {
    tracing::warn!(event = "halt_cleared", operator = %operator, "integrity halt cleared");
}

/// Log an operating-mode transition.
pub fn mode_changed(from: &str, to: &str, reason: &str) {
    tracing::info!(
        event = "mode_changed",
        from = %from,
        to = %to,
        reason = %reason,
        "operating mode changed"
    );
}

/// Log a completed normalization pass.
pub fn normalization_run(agent_count: usize, anchor_count: usize) {
    tracing::info!(
        event = "normalization_run",
        agent_count = agent_count,
        anchor_count = anchor_count,
        "influence weights normalized"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log an L3 request escalated past its overseer deadline.
pub fn sla_breached(queue_id: i64, hours_overdue: f64, severity: &str) {
    tracing::warn!(
        event = "sla_breached",
        queue_id = queue_id,
        hours_overdue = hours_overdue,
        severity = %severity,
        "L3 approval past its deadline"
    );
}
