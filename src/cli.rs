use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::model::Provider;

/// Identifies potential exposure of cloud metadata endpoints.
#[derive(Debug, Parser)]
#[command(name = "metadata-scanner", version, about)]
pub struct Args {
    /// Timeout in seconds for HTTP requests. Default is 5 seconds.
    #[arg(short, long, allow_negative_numbers = true)]
    pub timeout: Option<i64>,

    /// Custom user agent string for HTTP requests.
    #[arg(short, long)]
    pub user_agent: Option<String>,

    /// Output file to save the scan results (JSON format).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Cloud providers to scan, in order. All providers are scanned if omitted.
    #[arg(long, value_enum, num_args = 1..)]
    pub providers: Option<Vec<Provider>>,

    /// Config file to read instead of the default location.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also write logs to a daily-rolling file in this directory.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log debug output.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Log level used when `RUST_LOG` is not set.
    pub const fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::DEBUG
        } else if self.quiet {
            LevelFilter::ERROR
        } else {
            LevelFilter::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("metadata-scanner").chain(argv.iter().copied()))
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&["-t", "10", "-u", "MyCustomScanner/1.0", "-o", "out.json"]).unwrap();
        assert_eq!(args.timeout, Some(10));
        assert_eq!(args.user_agent.as_deref(), Some("MyCustomScanner/1.0"));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(args.providers, None);
    }

    #[test]
    fn test_providers_keep_order() {
        let args = parse(&["--providers", "GCP", "AWS"]).unwrap();
        assert_eq!(args.providers, Some(vec![Provider::Gcp, Provider::Aws]));
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        assert!(parse(&["--providers", "Oracle"]).is_err());
    }

    #[test]
    fn test_provider_names_are_case_sensitive() {
        assert!(parse(&["--providers", "aws"]).is_err());
        assert!(parse(&["--providers", "AWS", "gcp"]).is_err());
        assert!(parse(&["--providers", "Azure"]).is_ok());
    }

    #[test]
    fn test_negative_timeout_parses() {
        assert_eq!(parse(&["-t", "-5"]).unwrap().timeout, Some(-5));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse(&[]).unwrap().log_level(), LevelFilter::INFO);
        assert_eq!(parse(&["-v"]).unwrap().log_level(), LevelFilter::DEBUG);
        assert_eq!(parse(&["-q"]).unwrap().log_level(), LevelFilter::ERROR);
        assert!(parse(&["-v", "-q"]).is_err());
    }
}
