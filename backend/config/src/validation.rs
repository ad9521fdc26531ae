//! Config validation: schema checks with user-friendly error messages.

use crate::defaults::MAX_REPORT_COOLDOWN_SECS;
use crate::schema::PairlineConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &PairlineConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_matchmaking(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_server(config: &PairlineConfig, report: &mut ValidationReport) {
    let Some(server) = &config.server else { return };
    if let Some(port) = server.port {
        if port == 0 {
            report.error("server.port", "Port must be > 0");
        } else if port < 1024 && port != 80 && port != 443 {
            report.warn(
                "server.port",
                format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
            );
        }
    }
    if let Some(bind) = &server.bind {
        if bind.parse::<std::net::IpAddr>().is_err() {
            report.error("server.bind", format!("'{bind}' is not an IP address"));
        }
    }
}

fn validate_matchmaking(config: &PairlineConfig, report: &mut ValidationReport) {
    let Some(mm) = &config.matchmaking else { return };
    if mm.max_display_name_len == Some(0) {
        report.error("matchmaking.maxDisplayNameLen", "maxDisplayNameLen must be >= 1");
    }
    if mm.max_chat_len == Some(0) {
        report.error("matchmaking.maxChatLen", "maxChatLen must be >= 1");
    }
    if let Some(secs) = mm.report_cooldown_secs {
        if secs > MAX_REPORT_COOLDOWN_SECS {
            report.error(
                "matchmaking.reportCooldownSecs",
                format!("reportCooldownSecs must be <= {MAX_REPORT_COOLDOWN_SECS}"),
            );
        } else if secs > 24 * 60 * 60 {
            report.warn(
                "matchmaking.reportCooldownSecs",
                "Cooldown longer than a day; reported users are effectively banned until restart",
            );
        }
    }
}

fn validate_logging(config: &PairlineConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        if level.trim().is_empty() {
            report.error("logging.level", "Log level cannot be empty");
        }
    }
}
