//! Outcome records for bulk analysis runs.

use serde::{Deserialize, Serialize};

use crate::domain::{OwnerId, TopicId, TrendResult};

/// Terminal outcome for one topic within a bulk run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TopicOutcome {
    Succeeded(TrendResult),
    Failed { error: String },
}

/// One topic's result inside a bulk report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicReport {
    pub topic_id: TopicId,
    pub outcome: TopicOutcome,
}

impl TopicReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, TopicOutcome::Succeeded(_))
    }
}

/// Final report for one owner's bulk analysis.
///
/// A bulk run never fails wholesale: per-topic failures are itemized here
/// and counted, and the report itself is always produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerReport {
    pub owner_id: OwnerId,
    pub succeeded: usize,
    pub failed: usize,
    /// True when the run stopped early on a cancellation request; topics
    /// not yet started are simply absent from `topics`.
    pub cancelled: bool,
    pub topics: Vec<TopicReport>,
}

impl OwnerReport {
    /// The explicit empty report for an owner with no active topics.
    #[must_use]
    pub fn empty(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            succeeded: 0,
            failed: 0,
            cancelled: false,
            topics: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_reports(owner_id: OwnerId, topics: Vec<TopicReport>, cancelled: bool) -> Self {
        let succeeded = topics.iter().filter(|t| t.is_success()).count();
        let failed = topics.len() - succeeded;
        Self {
            owner_id,
            succeeded,
            failed,
            cancelled,
            topics,
        }
    }
}

/// Aggregated report for a system-wide scheduled run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemReport {
    pub succeeded: usize,
    pub failed: usize,
    pub owners: Vec<OwnerReport>,
}

impl SystemReport {
    #[must_use]
    pub fn from_owners(owners: Vec<OwnerReport>) -> Self {
        let succeeded = owners.iter().map(|o| o.succeeded).sum();
        let failed = owners.iter().map(|o| o.failed).sum();
        Self {
            succeeded,
            failed,
            owners,
        }
    }
}
