//! Telemetry and structured logging components for Pairline.
//!
//! Handles console/JSON output, optional daily file rotation (NDJSON), and
//! the structured matchmaking event log.

pub mod event_logger;
pub mod logger;

pub use event_logger::{EventLogEntry, EventLogger, MatchEvent};
pub use logger::init_logger;
