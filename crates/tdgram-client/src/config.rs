//! ---
//! tdg_section: "03-correlation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Request/response correlation over a TdLib stream."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSecondsWithFrac};
use tdgram_schema::LogStream;
use tracing::debug;

/// Highest verbosity TdLib accepts.
pub const MAX_VERBOSITY_LEVEL: i32 = 1023;

fn default_query_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_receive_timeout() -> Duration {
    Duration::from_millis(100)
}

fn default_handshake_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_file_size() -> i64 {
    i64::MAX
}

/// Client configuration, usually loaded from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Query deadlines.
    #[serde(default)]
    pub query: QueryConfig,
    /// Startup verification.
    #[serde(default)]
    pub handshake: HandshakeConfig,
    /// TdLib's internal logger.
    #[serde(default)]
    pub tdlib_log: TdLibLogConfig,
}

/// Metadata describing where a [`ClientConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedClientConfig {
    /// Parsed configuration.
    pub config: ClientConfig,
    /// File it came from.
    pub source: PathBuf,
}

impl ClientConfig {
    /// Environment variable naming a configuration file that overrides the candidates.
    pub const ENV_CONFIG_PATH: &'static str = "TDGRAM_CONFIG";

    /// Load configuration from disk, respecting the `TDGRAM_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedClientConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedClientConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedClientConfig {
                    config,
                    source: path.to_path_buf(),
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    /// Parse and validate a single configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<ClientConfig>()
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        if self.query.receive_timeout.is_zero() {
            return Err(anyhow!("query.receive_timeout must be greater than zero"));
        }
        self.tdlib_log.validate()
    }
}

impl std::str::FromStr for ClientConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: ClientConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Deadlines for [`TdClient::query_default`](crate::TdClient::query_default).
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Overall budget for one query, in seconds.
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    #[serde(default = "default_query_timeout")]
    pub timeout: Duration,
    /// Poll interval: how long each receive inside a query may block, in seconds.
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    #[serde(default = "default_receive_timeout")]
    pub receive_timeout: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            timeout: default_query_timeout(),
            receive_timeout: default_receive_timeout(),
        }
    }
}

/// Startup verification settings.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakeConfig {
    /// How long to wait for TdLib's first packet, in seconds.
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    #[serde(default = "default_handshake_timeout")]
    pub timeout: Duration,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            timeout: default_handshake_timeout(),
        }
    }
}

/// Settings forwarded to TdLib's own logger through `execute`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TdLibLogConfig {
    /// Verbosity 0..=1023; untouched when unset.
    #[serde(default)]
    pub verbosity: Option<i32>,
    /// Log destination; untouched when unset.
    #[serde(default)]
    pub stream: Option<LogStreamConfig>,
}

impl TdLibLogConfig {
    fn validate(&self) -> Result<()> {
        if let Some(level) = self.verbosity {
            if !(0..=MAX_VERBOSITY_LEVEL).contains(&level) {
                return Err(anyhow!(
                    "tdlib_log.verbosity must be within 0..={MAX_VERBOSITY_LEVEL}, got {level}"
                ));
            }
        }
        if let Some(LogStreamConfig::File { path, .. }) = &self.stream {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("tdlib_log.stream.path must not be empty"));
            }
        }
        Ok(())
    }
}

/// Where TdLib writes its internal log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogStreamConfig {
    /// stderr or the platform log.
    Default,
    /// Discard.
    Empty,
    /// Size-rotated file.
    File {
        /// Log file location.
        path: PathBuf,
        /// Rotation threshold in bytes; unbounded when unset.
        #[serde(default = "default_max_file_size")]
        max_file_size: i64,
        /// Also redirect stderr into the file.
        #[serde(default)]
        redirect_stderr: bool,
    },
}

impl LogStreamConfig {
    /// The schema object sent with `setLogStream`.
    pub fn to_log_stream(&self) -> LogStream {
        match self {
            LogStreamConfig::Default => LogStream::Default,
            LogStreamConfig::Empty => LogStream::Empty,
            LogStreamConfig::File {
                path,
                max_file_size,
                redirect_stderr,
            } => LogStream::File {
                path: path.display().to_string(),
                max_file_size: *max_file_size,
                redirect_stderr: *redirect_stderr,
            },
        }
    }
}
