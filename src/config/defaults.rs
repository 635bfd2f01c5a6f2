use std::time::Duration;

use crate::config::ScanConfig;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_USER_AGENT: &str = "vuln-Cloud-Metadata-Scanner/1.0";

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output: None,
            providers: None,
            log_dir: None,
            endpoints: super::EndpointOverrides::default(),
        }
    }
}
