use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::constants::DEFAULT_SEARCH_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Search
    pub search_url: String,
    pub company_list_path: PathBuf,
    pub request_timeout: Duration,

    // Scheduling
    pub run_mode: RunMode,
    pub scrape_interval: Duration,

    // Notification
    pub notify_enabled: bool,
    pub mail: Option<MailConfig>,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Run a single scrape cycle and exit
    Once,
    /// Run a scrape cycle on a fixed interval until stopped
    Watch,
    /// Serve the scrape endpoint over HTTP
    Serve,
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Implicit TLS (port 465)
    Tls,
    /// Plain connection upgraded with STARTTLS (port 587)
    StartTls,
    /// Unencrypted, for local relays only
    None,
}

/// Credentials and relay settings for the notifier.
///
/// Built once from the environment and handed to the notifier by reference.
#[derive(Clone)]
pub struct MailConfig {
    pub smtp_user: String,
    pub smtp_password: String,
    pub recipient: String,
    pub smtp_host: String,
    pub smtp_port: Option<u16>,
    pub smtp_security: SmtpSecurity,
    pub smtp_timeout: Duration,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_user", &self.smtp_user)
            .field("smtp_password", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_security", &self.smtp_security)
            .field("smtp_timeout", &self.smtp_timeout)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let notify_enabled = parse_env_bool("NOTIFY_ENABLED", false)?;
        let mail = if notify_enabled {
            Some(MailConfig::from_env()?)
        } else {
            None
        };

        Ok(Self {
            // Search
            search_url: env_or_default("SEARCH_URL", DEFAULT_SEARCH_URL),
            company_list_path: PathBuf::from(env_or_default(
                "COMPANY_LIST_PATH",
                "./companyList.json",
            )),
            request_timeout: Duration::from_secs(parse_env_u64("REQUEST_TIMEOUT_SECS", 30)?),

            // Scheduling
            run_mode: parse_run_mode(&env_or_default("RUN_MODE", "once"))?,
            scrape_interval: Duration::from_secs(parse_env_u64("SCRAPE_INTERVAL_SECS", 3600)?),

            // Notification
            notify_enabled,
            mail,

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 4000)?,
        })
    }

    /// Configuration with defaults and no mail settings, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            company_list_path: PathBuf::from("./companyList.json"),
            request_timeout: Duration::from_secs(5),
            run_mode: RunMode::Once,
            scrape_interval: Duration::from_secs(3600),
            notify_enabled: false,
            mail: None,
            web_host: "127.0.0.1".to_string(),
            web_port: 4000,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match url::Url::parse(&self.search_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::InvalidValue {
                    name: "SEARCH_URL".to_string(),
                    message: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    name: "SEARCH_URL".to_string(),
                    message: e.to_string(),
                });
            }
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.run_mode == RunMode::Watch && self.scrape_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "SCRAPE_INTERVAL_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.notify_enabled {
            match &self.mail {
                Some(mail) => mail.validate()?,
                None => return Err(ConfigError::MissingEnvVar("MAIL_USER".to_string())),
            }
        }
        Ok(())
    }
}

impl MailConfig {
    /// Load mail settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials or the recipient are missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            smtp_user: required_env("MAIL_USER")?,
            smtp_password: required_env("MAIL_PASS")?,
            recipient: required_env("MAIL_TO")?,
            smtp_host: env_or_default("SMTP_HOST", "smtp.gmail.com"),
            smtp_port: parse_optional_u16("SMTP_PORT")?,
            smtp_security: parse_smtp_security(&env_or_default("SMTP_TLS", "tls"))?,
            smtp_timeout: Duration::from_secs(parse_env_u64("SMTP_TIMEOUT_SECS", 30)?),
        })
    }

    /// Validate that the mail settings are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("MAIL_USER", &self.smtp_user),
            ("MAIL_PASS", &self.smtp_password),
            ("MAIL_TO", &self.recipient),
            ("SMTP_HOST", &self.smtp_host),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: "cannot be empty".to_string(),
                });
            }
        }
        if self.smtp_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "SMTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_optional_u16(name: &str) -> Result<Option<u16>, ConfigError> {
    optional_env(name)
        .map(|val| {
            val.parse().map_err(|e| ConfigError::ParseInt {
                name: name.to_string(),
                source: e,
            })
        })
        .transpose()
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}

fn parse_run_mode(value: &str) -> Result<RunMode, ConfigError> {
    match value.to_lowercase().as_str() {
        "once" => Ok(RunMode::Once),
        "watch" => Ok(RunMode::Watch),
        "serve" => Ok(RunMode::Serve),
        _ => Err(ConfigError::InvalidValue {
            name: "RUN_MODE".to_string(),
            message: format!("must be 'once', 'watch' or 'serve', got '{value}'"),
        }),
    }
}

fn parse_smtp_security(value: &str) -> Result<SmtpSecurity, ConfigError> {
    match value.to_lowercase().as_str() {
        "tls" | "ssl" => Ok(SmtpSecurity::Tls),
        "starttls" => Ok(SmtpSecurity::StartTls),
        "none" | "plain" => Ok(SmtpSecurity::None),
        _ => Err(ConfigError::InvalidValue {
            name: "SMTP_TLS".to_string(),
            message: format!("must be 'tls', 'starttls' or 'none', got '{value}'"),
        }),
    }
}
