//! Domain models for the scanner.
//!
//! - [`Provider`] - Cloud provider enumeration with its fixed metadata endpoint
//! - [`ProbeResult`] - Outcome of probing one provider
//! - [`ScanReport`] - Ordered collection of results for a whole scan

pub mod provider;
pub mod report;

pub use provider::{Provider, ResponseDecoding};
pub use report::{ProbeResult, ScanReport};
