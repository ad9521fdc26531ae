pub mod error;
pub mod event;
pub mod traits;
pub mod types;

pub use error::PairlineError;
pub use event::{ReportReason, ReportRecord};
pub use traits::ModerationSink;
pub use types::{ConnId, GenderTag, Profile, DEFAULT_DISPLAY_NAME, FALLBACK_SENDER_NAME};
