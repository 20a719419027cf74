//! Source Credibility Index: tiered base credibility that decays on failed
//! citations and recovers on successful ones.

use std::sync::Arc;

use rusqlite::Connection;
use tracing::{debug, info};

use warden_core::config::CredibilityConfig;
use warden_core::errors::WardenResult;
use warden_core::models::{CredibilityAction, CredibilityCheck, RiskGrade, SourceRecord, SourceTier};
use warden_storage::queries::source_ops;
use warden_storage::{fmt_ts, immediate_transaction, now_ts, StorageEngine};

use crate::tiers::{classify_tier, domain_of, source_id};

/// Decide what a source's SCI means for an artifact of `grade`.
///
/// Below the reject threshold the artifact is rejected. Otherwise L1 rises
/// to L2 below `l1_to_l2_threshold` and L2 rises to L3 below the lower
/// `l2_to_l3_threshold`. The grade never goes down.
///
/// ```
/// use warden_core::config::CredibilityConfig;
/// use warden_core::models::{CredibilityAction, RiskGrade};
/// use warden_credibility::sci::escalation;
///
/// let config = CredibilityConfig::default();
/// assert_eq!(escalation(45.0, RiskGrade::L1, &config).1, RiskGrade::L2);
/// assert_eq!(escalation(45.0, RiskGrade::L2, &config).0, CredibilityAction::Accept);
/// assert_eq!(escalation(20.0, RiskGrade::L3, &config).0, CredibilityAction::Reject);
/// ```
pub fn escalation(
    sci: f64,
    grade: RiskGrade,
    config: &CredibilityConfig,
) -> (CredibilityAction, RiskGrade, String) {
    if sci < config.reject_threshold {
        return (
            CredibilityAction::Reject,
            grade,
            format!("SCI {sci:.1} is below the reject threshold {:.1}", config.reject_threshold),
        );
    }
    let threshold = match grade {
        RiskGrade::L1 => Some(config.l1_to_l2_threshold),
        RiskGrade::L2 => Some(config.l2_to_l3_threshold),
        RiskGrade::L3 => None,
    };
    match threshold {
        Some(t) if sci < t => {
            let raised = grade.escalate();
            (
                CredibilityAction::Escalate,
                raised,
                format!("SCI {sci:.1} is below {t:.1}: {grade} escalated to {raised}"),
            )
        }
        _ => (
            CredibilityAction::Accept,
            grade,
            format!("SCI {sci:.1} is acceptable at {grade}"),
        ),
    }
}

/// SCI after one verification outcome: `+success_delta` capped at base,
/// `-failure_delta` floored at zero.
pub fn apply_outcome(sci: f64, base: f64, success: bool, config: &CredibilityConfig) -> f64 {
    if success {
        (sci + config.success_delta).min(base)
    } else {
        (sci - config.failure_delta).max(0.0)
    }
}

/// The per-workspace source table.
pub struct SourceCredibilityIndex {
    storage: Arc<StorageEngine>,
    config: CredibilityConfig,
}

impl SourceCredibilityIndex {
    pub fn new(storage: Arc<StorageEngine>, config: CredibilityConfig) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &CredibilityConfig {
        &self.config
    }

    /// Register `url` at its classified tier (or `tier` when given) with SCI
    /// at the tier's base. An already registered source is returned as is.
    pub async fn register_source(
        &self,
        url: &str,
        tier: Option<SourceTier>,
    ) -> WardenResult<SourceRecord> {
        let workspace_id = self.storage.workspace_id();
        self.storage
            .with_writer(|conn| register_with_conn(conn, workspace_id, url, tier))
            .await
    }

    pub async fn get_source(&self, url: &str) -> WardenResult<Option<SourceRecord>> {
        let workspace_id = self.storage.workspace_id();
        let id = source_id(url);
        self.storage
            .with_reader(|conn| source_ops::get_source(conn, workspace_id, &id))
            .await
    }

    /// Record one citation outcome. Unknown sources are registered first.
    pub async fn update_verification(&self, url: &str, success: bool) -> WardenResult<SourceRecord> {
        let workspace_id = self.storage.workspace_id();
        let record = self
            .storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    let mut record = register_with_conn(conn, workspace_id, url, None)?;
                    record.sci =
                        apply_outcome(record.sci, record.base_credibility, success, &self.config);
                    record.citation_count += 1;
                    if !success {
                        record.failure_count += 1;
                    }
                    record.last_verified = Some(now_ts());
                    source_ops::update_source_stats(conn, workspace_id, &record)?;
                    Ok(record)
                })
            })
            .await?;
        debug!(url, success, sci = record.sci, "source credibility updated");
        Ok(record)
    }

    /// Check `url` against an artifact of `grade`. Unknown sources are
    /// registered at their classified tier.
    pub async fn check_credibility(&self, url: &str, grade: RiskGrade) -> WardenResult<CredibilityCheck> {
        let record = self.register_source(url, None).await?;
        let (action, resulting_grade, reason) = escalation(record.sci, grade, &self.config);
        if action != CredibilityAction::Accept {
            info!(url, sci = record.sci, action = action.as_str(), "source credibility check");
        }
        Ok(CredibilityCheck {
            source_id: record.source_id,
            url: url.to_string(),
            tier: record.tier,
            sci: record.sci,
            action,
            original_grade: grade,
            resulting_grade,
            reason,
        })
    }

    /// Sources with SCI strictly below `threshold`, lowest first.
    pub async fn low_credibility_sources(&self, threshold: f64) -> WardenResult<Vec<SourceRecord>> {
        let workspace_id = self.storage.workspace_id();
        self.storage
            .with_reader(|conn| source_ops::list_below(conn, workspace_id, threshold))
            .await
    }
}

fn register_with_conn(
    conn: &Connection,
    workspace_id: &str,
    url: &str,
    tier: Option<SourceTier>,
) -> WardenResult<SourceRecord> {
    let id = source_id(url);
    if let Some(existing) = source_ops::get_source(conn, workspace_id, &id)? {
        return Ok(existing);
    }
    let tier = tier.unwrap_or_else(|| classify_tier(url));
    let base = tier.base_credibility();
    let record = SourceRecord {
        source_id: id,
        url: url.to_string(),
        domain: domain_of(url),
        tier,
        base_credibility: base,
        sci: base,
        citation_count: 0,
        failure_count: 0,
        last_verified: None,
    };
    source_ops::insert_source(conn, workspace_id, &record, &fmt_ts(&now_ts()))?;
    debug!(url, tier = tier.as_str(), "source registered");
    Ok(record)
}
