mod defaults;
pub mod loader;

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::cli::Args;
use crate::model::Provider;

pub use loader::load;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Timeout value must be greater than 0.")]
    InvalidTimeout(i64),
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Per-provider endpoint replacements, e.g. to route probes through a
/// proxy or at a mock metadata service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointOverrides {
    pub aws: Option<String>,
    pub azure: Option<String>,
    pub gcp: Option<String>,
}

impl EndpointOverrides {
    pub fn get(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Aws => self.aws.as_deref(),
            Provider::Azure => self.azure.as_deref(),
            Provider::Gcp => self.gcp.as_deref(),
        }
    }
}

/// Contents of the optional TOML config file. Every key may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub timeout: Option<i64>,
    pub user_agent: Option<String>,
    pub providers: Option<Vec<Provider>>,
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub endpoints: EndpointOverrides,
}

/// Fully resolved, validated scan configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub output: Option<PathBuf>,
    /// Explicit subset to scan, in the requested order. `None` scans all.
    pub providers: Option<Vec<Provider>>,
    pub log_dir: Option<PathBuf>,
    pub endpoints: EndpointOverrides,
}

impl ScanConfig {
    /// Merge CLI arguments over the config file over built-in defaults.
    pub fn resolve(args: &Args, file: FileConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let timeout = match args.timeout.or(file.timeout) {
            Some(secs) => validate_timeout(secs)?,
            None => defaults.timeout,
        };

        Ok(Self {
            timeout,
            user_agent: args
                .user_agent
                .clone()
                .or(file.user_agent)
                .unwrap_or(defaults.user_agent),
            output: args.output.clone(),
            providers: args.providers.clone().or(file.providers),
            log_dir: args.log_dir.clone().or(file.log_dir),
            endpoints: file.endpoints,
        })
    }
}

fn validate_timeout(secs: i64) -> Result<Duration, ConfigError> {
    u64::try_from(secs)
        .ok()
        .filter(|&s| s > 0)
        .map(Duration::from_secs)
        .ok_or(ConfigError::InvalidTimeout(secs))
}
