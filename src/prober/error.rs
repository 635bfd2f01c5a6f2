use std::error::Error as _;

use reqwest::StatusCode;
use thiserror::Error;

use crate::model::Provider;

/// Why a single probe failed. The `Display` text is what ends up in the
/// report, so every message names the provider.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Timeout, refused connection, DNS failure and the like.
    #[error("Error accessing {provider} metadata: {}", describe(.source))]
    Request {
        provider: Provider,
        source: reqwest::Error,
    },
    #[error("Error accessing {provider} metadata: {status} for url: {url}")]
    Status {
        provider: Provider,
        status: StatusCode,
        url: String,
    },
    #[error(
        "Error accessing {provider} metadata: redirect {status} not followed (location: {})",
        .location.as_deref().unwrap_or("<none>")
    )]
    Redirect {
        provider: Provider,
        status: StatusCode,
        location: Option<String>,
    },
    #[error("Error accessing {provider} metadata: failed to read response body: {}", describe(.source))]
    Body {
        provider: Provider,
        source: reqwest::Error,
    },
    #[error("Error decoding JSON response from {provider}: {source}")]
    Decode {
        provider: Provider,
        source: serde_json::Error,
    },
}

impl ProbeError {
    pub const fn provider(&self) -> Provider {
        match self {
            Self::Request { provider, .. }
            | Self::Status { provider, .. }
            | Self::Redirect { provider, .. }
            | Self::Body { provider, .. }
            | Self::Decode { provider, .. } => *provider,
        }
    }
}

// reqwest keeps the useful detail (timed out, connection refused, dns error)
// in the source chain rather than its own message.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
