use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;

use crate::model::ScanReport;

const INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize scan results: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Scan results are not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("Error writing to output file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("Error writing scan results to stdout: {0}")]
    Stdout(#[source] io::Error),
}

/// Render the report as JSON indented with four spaces.
pub fn render(report: &ScanReport) -> Result<String, OutputError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    report.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Write the report to `path`, replacing any existing file.
pub fn write_file(report: &ScanReport, path: &Path) -> Result<(), OutputError> {
    let json = render(report)?;
    fs::write(path, json).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_stdout(report: &ScanReport) -> Result<(), OutputError> {
    let json = render(report)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").map_err(OutputError::Stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProbeResult, Provider};

    fn report() -> ScanReport {
        let mut report = ScanReport::new();
        report.insert(Provider::Aws, ProbeResult::success("ami-id"));
        report.insert(
            Provider::Azure,
            ProbeResult::failure("Error accessing Azure metadata: 500 Internal Server Error"),
        );
        report
    }

    #[test]
    fn test_render_uses_four_space_indent() {
        let expected = r#"{
    "AWS": {
        "success": true,
        "data": "ami-id"
    },
    "Azure": {
        "success": false,
        "data": "Error accessing Azure metadata: 500 Internal Server Error"
    }
}"#;
        assert_eq!(render(&report()).unwrap(), expected);
    }

    #[test]
    fn test_file_matches_rendered_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "stale contents that are longer than the report itself").unwrap();

        write_file(&report(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, render(&report()).unwrap());
        let parsed: ScanReport = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, report());
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");

        let err = write_file(&report(), &path).unwrap_err();
        assert!(matches!(err, OutputError::Write { .. }));
        assert!(err.to_string().starts_with("Error writing to output file"));
    }
}
