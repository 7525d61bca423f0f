// src/config.rs
use crate::errors::{Result, SolverError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://chetanchauhan.com/api/v1/solve";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_COPY_RESET_MS: u64 = 2000;

/// When a copy action flips its acknowledged flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AckPolicy {
    /// Acknowledge even if the clipboard write failed.
    #[default]
    Optimistic,
    /// Acknowledge only after the clipboard reports success.
    Confirmed,
}

impl FromStr for AckPolicy {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(AckPolicy::Optimistic),
            "confirmed" => Ok(AckPolicy::Confirmed),
            other => Err(SolverError::Config(format!("unknown ack policy '{}'", other))),
        }
    }
}

/// What happens when an older submission resolves after a newer one was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionPolicy {
    /// Resolutions for anything but the latest ticket are dropped.
    #[default]
    LastSubmit,
    /// Every resolution overwrites the visible state.
    LastResolution,
}

impl FromStr for ResolutionPolicy {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-submit" => Ok(ResolutionPolicy::LastSubmit),
            "last-resolution" => Ok(ResolutionPolicy::LastResolution),
            other => Err(SolverError::Config(format!("unknown resolution policy '{}'", other))),
        }
    }
}

/// Settings shared by every copy action in a rendered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopySettings {
    pub reset_after: Duration,
    pub ack_policy: AckPolicy,
}

impl Default for CopySettings {
    fn default() -> Self {
        Self {
            reset_after: Duration::from_millis(DEFAULT_COPY_RESET_MS),
            ack_policy: AckPolicy::default(),
        }
    }
}

/// High-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub copy: CopySettings,
    pub resolution_policy: ResolutionPolicy,
    pub bind: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            copy: CopySettings::default(),
            resolution_policy: ResolutionPolicy::default(),
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// On-disk form of [`AppConfig`]; every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
    copy_reset_ms: Option<u64>,
    ack_policy: Option<AckPolicy>,
    resolution_policy: Option<ResolutionPolicy>,
    bind: Option<String>,
    port: Option<u16>,
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(raw)?;
        let default = Self::default();

        let config = Self {
            endpoint: file.endpoint.unwrap_or(default.endpoint),
            timeout: file.timeout_secs.map(Duration::from_secs).unwrap_or(default.timeout),
            copy: CopySettings {
                reset_after: file
                    .copy_reset_ms
                    .map(Duration::from_millis)
                    .unwrap_or(default.copy.reset_after),
                ack_policy: file.ack_policy.unwrap_or(default.copy.ack_policy),
            },
            resolution_policy: file.resolution_policy.unwrap_or(default.resolution_policy),
            bind: file.bind.unwrap_or(default.bind),
            port: file.port.unwrap_or(default.port),
        };
        config.validate()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let default = Self::default();

        let config = Self {
            endpoint: lookup("SOLVER_ENDPOINT").unwrap_or(default.endpoint),
            timeout: parse_var(&lookup, "SOLVER_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(default.timeout),
            copy: CopySettings {
                reset_after: parse_var(&lookup, "SOLVER_COPY_RESET_MS")?
                    .map(Duration::from_millis)
                    .unwrap_or(default.copy.reset_after),
                ack_policy: parse_var(&lookup, "SOLVER_ACK_POLICY")?.unwrap_or(default.copy.ack_policy),
            },
            resolution_policy: parse_var(&lookup, "SOLVER_RESOLUTION_POLICY")?
                .unwrap_or(default.resolution_policy),
            bind: lookup("SOLVER_BIND").unwrap_or(default.bind),
            port: parse_var(&lookup, "SOLVER_PORT")?.unwrap_or(default.port),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(SolverError::Config(format!(
                "solve endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.timeout.is_zero() {
            return Err(SolverError::Config("request timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SolverError::Config(format!("{} has an invalid value '{}'", key, value))),
        None => Ok(None),
    }
}
