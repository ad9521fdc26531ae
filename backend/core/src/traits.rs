use crate::event::ReportRecord;

/// Destination for manual reports.
///
/// Called while the matchmaking state is locked, so implementations must
/// return promptly. Anything slow belongs behind a channel.
pub trait ModerationSink: Send + Sync {
    /// Human-readable name of this sink (e.g., "tracing", "memory").
    fn name(&self) -> &str;

    /// Accept one report. Delivery is best effort.
    fn submit(&self, record: ReportRecord);
}
