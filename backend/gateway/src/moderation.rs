//! Moderation sinks for manual reports.

use std::sync::{Arc, Mutex};

use pairline_core::{ModerationSink, ReportRecord};
use pairline_logging::{EventLogger, MatchEvent};
use tracing::warn;

/// Writes every report to the log. The default sink.
#[derive(Debug, Default, Clone)]
pub struct TracingModerationSink;

impl ModerationSink for TracingModerationSink {
    fn name(&self) -> &str {
        "tracing"
    }

    fn submit(&self, record: ReportRecord) {
        warn!(
            report_id = %record.id,
            reporter = %record.reporter,
            reported = %record.reported,
            reason = %record.reason,
            was_partner = record.was_partner,
            "User report received"
        );
        EventLogger::log_event(
            &record.reporter.to_string(),
            MatchEvent::Report {
                reported: record.reported.to_string(),
                reason: record.reason.to_string(),
            },
        );
    }
}

/// Keeps reports in memory so they can be inspected later.
#[derive(Debug, Default, Clone)]
pub struct MemoryModerationSink {
    records: Arc<Mutex<Vec<ReportRecord>>>,
}

impl MemoryModerationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ReportRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ModerationSink for MemoryModerationSink {
    fn name(&self) -> &str {
        "memory"
    }

    fn submit(&self, record: ReportRecord) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
    }
}
