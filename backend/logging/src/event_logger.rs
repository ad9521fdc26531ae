//! Matchmaking Event Logger
//!
//! Lifecycle events (connect, wait, pair, teardown, report) written as
//! single-line JSON under the `match_events` tracing target. Chat text and
//! handshake payloads never pass through here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    Connected {
        online: usize,
    },
    Waiting {
        queue_len: usize,
    },
    Paired {
        partner: String,
        initiator: bool,
    },
    PartnerLeft {
        partner: String,
    },
    Report {
        reported: String,
        reason: String,
    },
    CooldownRefused {
        remaining_secs: u64,
    },
    Disconnected {
        online: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub conn_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: MatchEvent,
}

impl EventLogEntry {
    pub fn new(conn_id: impl Into<String>, event: MatchEvent) -> Self {
        Self {
            conn_id: conn_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Serialize a matchmaking event and hand it to the tracing system.
    pub fn log_event(conn_id: &str, event: MatchEvent) {
        let entry = EventLogEntry::new(conn_id, event);
        let line = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "match_events", event = %line, "Match event");
    }
}
