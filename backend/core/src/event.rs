use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ConnId;

/// Reasons a user can pick when reporting their partner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Nudity,
    Harassment,
    Spam,
    #[serde(other)]
    Other,
}

/// An immutable record of one manual report, handed to the moderation sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: Uuid,
    pub reporter: ConnId,
    pub reported: ConnId,
    pub reason: ReportReason,
    /// Whether `reported` was the reporter's partner at the time of the report.
    pub was_partner: bool,
    pub timestamp: DateTime<Utc>,
}

impl ReportRecord {
    pub fn new(reporter: ConnId, reported: ConnId, reason: ReportReason, was_partner: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            reporter,
            reported,
            reason,
            was_partner,
            timestamp: Utc::now(),
        }
    }
}

impl std::fmt::Display for ReportReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", s)
    }
}
