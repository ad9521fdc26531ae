//! Pairline runtime configuration schema.
//!
//! Every section is optional in the YAML file; missing values are filled in
//! by [`crate::defaults::apply_all_defaults`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for the Pairline gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairlineConfig {
    /// Listener settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Matchmaking policy knobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matchmaking: Option<MatchmakingConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

// ---------------------------------------------------------------------------
// Matchmaking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchmakingConfig {
    /// Put the survivor of a torn-down pairing straight back into the wait pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requeue_survivor: Option<bool>,
    /// Seconds a reported connection must wait before joining again. 0 disables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_cooldown_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_display_name_len: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chat_len: Option<usize>,
    /// How many ids of a join's `blocked` list are kept. Extra ids are ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_blocked: Option<usize>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `pairline_gateway=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling NDJSON log. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Emit JSON on the console instead of human-readable lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

impl PairlineConfig {
    pub fn bind(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_BIND)
    }

    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(crate::defaults::DEFAULT_PORT)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn requeue_survivor(&self) -> bool {
        self.matchmaking
            .as_ref()
            .and_then(|m| m.requeue_survivor)
            .unwrap_or(false)
    }

    pub fn report_cooldown_secs(&self) -> u64 {
        self.matchmaking
            .as_ref()
            .and_then(|m| m.report_cooldown_secs)
            .unwrap_or(crate::defaults::DEFAULT_REPORT_COOLDOWN_SECS)
    }

    pub fn max_display_name_len(&self) -> usize {
        self.matchmaking
            .as_ref()
            .and_then(|m| m.max_display_name_len)
            .unwrap_or(crate::defaults::DEFAULT_MAX_DISPLAY_NAME_LEN)
    }

    pub fn max_chat_len(&self) -> usize {
        self.matchmaking
            .as_ref()
            .and_then(|m| m.max_chat_len)
            .unwrap_or(crate::defaults::DEFAULT_MAX_CHAT_LEN)
    }

    pub fn max_blocked(&self) -> usize {
        self.matchmaking
            .as_ref()
            .and_then(|m| m.max_blocked)
            .unwrap_or(crate::defaults::DEFAULT_MAX_BLOCKED)
    }
}
