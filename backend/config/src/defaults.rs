//! Config defaults: applies sensible default values to parsed config.

use crate::schema::{LoggingConfig, MatchmakingConfig, PairlineConfig, ServerConfig};

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default `EnvFilter` directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default cooldown imposed on a reported connection.
pub const DEFAULT_REPORT_COOLDOWN_SECS: u64 = 60;

/// Longest cooldown the validator accepts (one week).
pub const MAX_REPORT_COOLDOWN_SECS: u64 = 7 * 24 * 60 * 60;

/// Default cap on the block list a client may send with each join.
pub const DEFAULT_MAX_BLOCKED: usize = 256;

/// Default cap on display name length, in characters.
pub const DEFAULT_MAX_DISPLAY_NAME_LEN: usize = 32;

/// Default cap on relayed chat text, in characters.
pub const DEFAULT_MAX_CHAT_LEN: usize = 2000;

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: PairlineConfig) -> PairlineConfig {
    let config = apply_server_defaults(config);
    let config = apply_matchmaking_defaults(config);
    apply_logging_defaults(config)
}

fn apply_server_defaults(mut config: PairlineConfig) -> PairlineConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    if server.bind.is_none() {
        server.bind = Some(DEFAULT_BIND.to_string());
    }
    if server.port.is_none() {
        server.port = Some(DEFAULT_PORT);
    }
    config
}

fn apply_matchmaking_defaults(mut config: PairlineConfig) -> PairlineConfig {
    let mm = config.matchmaking.get_or_insert_with(MatchmakingConfig::default);
    if mm.requeue_survivor.is_none() {
        mm.requeue_survivor = Some(false);
    }
    if mm.report_cooldown_secs.is_none() {
        mm.report_cooldown_secs = Some(DEFAULT_REPORT_COOLDOWN_SECS);
    }
    if mm.max_display_name_len.is_none() {
        mm.max_display_name_len = Some(DEFAULT_MAX_DISPLAY_NAME_LEN);
    }
    if mm.max_chat_len.is_none() {
        mm.max_chat_len = Some(DEFAULT_MAX_CHAT_LEN);
    }
    if mm.max_blocked.is_none() {
        mm.max_blocked = Some(DEFAULT_MAX_BLOCKED);
    }
    config
}

fn apply_logging_defaults(mut config: PairlineConfig) -> PairlineConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    config
}
