//! Process configuration
//!
//! All settings come from the environment (the deployment stores them as CI
//! secrets). They are read once at process start into an explicit [`Config`]
//! that is passed by reference to each component; nothing reads the
//! environment after construction.
//!
//! Required variables are validated eagerly, before any network activity,
//! and every error names the variable to fix.

use std::env;

use crate::report::ReportStyle;

/// Default SMTP submission port when `SMTP_PORT` is unset.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Full configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub mail: MailConfig,
    /// Send the report even when no alert fired (liveness check for the
    /// pipeline itself). `FORCE_SEND_OK=true`.
    pub force_send_ok: bool,
    /// Report body layout. `REPORT_STYLE=narrative|tabular`.
    pub report_style: ReportStyle,
}

/// Read-only store endpoint and credential.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Service-role key, sent as both `apikey` and bearer token.
    pub service_key: String,
}

/// Outbound mail transport and addressing.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    /// Sender address.
    pub report_from: String,
    /// Raw recipient list, comma- and/or semicolon-delimited.
    pub report_to: String,
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// Fails on the first missing or malformed required variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = require_var("SUPABASE_URL", "set it to the store's base URL")?
            .trim_end_matches('/')
            .to_string();
        let service_key =
            require_var("SUPABASE_SERVICE_ROLE_KEY", "set it to the service-role key")?;

        let smtp_host = require_var("SMTP_HOST", "set it to the SMTP relay hostname")?;
        let smtp_port = parse_port(env::var("SMTP_PORT").ok())?;
        let smtp_user = require_var("SMTP_USER", "set it to the SMTP login user")?;
        let smtp_pass = require_var("SMTP_PASS", "set it to the SMTP login password")?;
        let report_from = require_var("REPORT_FROM", "set it to the sender address")?;
        let report_to = require_var(
            "REPORT_TO",
            "set it to the recipient list, e.g. a@x.com,b@y.com",
        )?;

        let force_send_ok = parse_bool(env::var("FORCE_SEND_OK").ok());
        let report_style = parse_style(env::var("REPORT_STYLE").ok())?;

        Ok(Self {
            store: StoreConfig {
                base_url,
                service_key,
            },
            mail: MailConfig {
                smtp_host,
                smtp_port,
                smtp_user,
                smtp_pass,
                report_from,
                report_to,
            },
            force_send_ok,
            report_style,
        })
    }
}

fn require_var(name: &'static str, hint: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::Missing { name, hint }),
    }
}

/// Parse `SMTP_PORT`, defaulting to 587 (submission) when unset or empty.
fn parse_port(raw: Option<String>) -> Result<u16, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(DEFAULT_SMTP_PORT),
        Some(s) => s.parse::<u16>().map_err(|_| ConfigError::Malformed {
            name: "SMTP_PORT",
            value: s.to_string(),
            hint: "expected a port number, e.g. 587",
        }),
    }
}

/// Truthy only on the literal string `true`, case-insensitive.
fn parse_bool(raw: Option<String>) -> bool {
    raw.map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn parse_style(raw: Option<String>) -> Result<ReportStyle, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("narrative") => Ok(ReportStyle::Narrative),
        Some("tabular") => Ok(ReportStyle::Tabular),
        Some(other) => Err(ConfigError::Malformed {
            name: "REPORT_STYLE",
            value: other.to_string(),
            hint: "expected 'narrative' or 'tabular'",
        }),
    }
}

/// Configuration errors: fatal, detected before any network call.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not set ({hint})")]
    Missing {
        name: &'static str,
        hint: &'static str,
    },

    #[error("{name} has invalid value {value:?} ({hint})")]
    Malformed {
        name: &'static str,
        value: String,
        hint: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_default_when_unset() {
        assert_eq!(parse_port(None).unwrap(), 587);
        assert_eq!(parse_port(Some("".to_string())).unwrap(), 587);
    }

    #[test]
    fn test_port_parses_and_rejects_garbage() {
        assert_eq!(parse_port(Some("2525".to_string())).unwrap(), 2525);
        assert!(parse_port(Some("not-a-port".to_string())).is_err());
    }

    #[test]
    fn test_force_send_flag() {
        assert!(parse_bool(Some("true".to_string())));
        assert!(parse_bool(Some("TRUE".to_string())));
        assert!(!parse_bool(Some("yes".to_string())));
        assert!(!parse_bool(Some("false".to_string())));
        assert!(!parse_bool(None));
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!(parse_style(None).unwrap(), ReportStyle::Narrative);
        assert_eq!(
            parse_style(Some("tabular".to_string())).unwrap(),
            ReportStyle::Tabular
        );
        assert!(parse_style(Some("fancy".to_string())).is_err());
    }
}
