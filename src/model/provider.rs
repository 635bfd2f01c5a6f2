use std::fmt;

use clap::ValueEnum;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

/// Cloud providers whose instance-metadata service can be probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Provider {
    /// Amazon Web Services
    #[serde(rename = "AWS")]
    #[value(name = "AWS")]
    Aws,
    /// Microsoft Azure
    #[serde(rename = "Azure")]
    #[value(name = "Azure")]
    Azure,
    /// Google Cloud Platform
    #[serde(rename = "GCP")]
    #[value(name = "GCP")]
    Gcp,
}

/// How a successful response body is turned into report data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDecoding {
    /// Body is captured verbatim.
    Text,
    /// Body must be valid JSON; it is re-encoded compactly.
    Json,
}

impl Provider {
    /// Default scan order.
    pub const ALL: [Self; 3] = [Self::Aws, Self::Azure, Self::Gcp];

    /// Human-readable display name, also used as the report key.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Azure => "Azure",
            Self::Gcp => "GCP",
        }
    }

    /// Short lowercase identifier for the provider.
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Azure => "azure",
            Self::Gcp => "gcp",
        }
    }

    /// Well-known metadata endpoint.
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::Aws => "http://169.254.169.254/latest/meta-data/",
            Self::Azure => "http://169.254.169.254/metadata/instance?api-version=2020-09-01",
            Self::Gcp => "http://metadata.google.internal/computeMetadata/v1/",
        }
    }

    /// Header the metadata service insists on, if any.
    ///
    /// Azure and GCP reject requests without it as a guard against SSRF.
    /// AWS (IMDSv1) accepts bare requests.
    pub const fn required_header(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Aws => None,
            Self::Azure => Some(("metadata", "true")),
            Self::Gcp => Some(("metadata-flavor", "Google")),
        }
    }

    pub const fn decoding(&self) -> ResponseDecoding {
        match self {
            Self::Azure => ResponseDecoding::Json,
            Self::Aws | Self::Gcp => ResponseDecoding::Text,
        }
    }

    /// Headers sent when the caller does not supply any.
    pub fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some((name, value)) = self.required_header() {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        headers
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed() {
        assert_eq!(
            Provider::Aws.endpoint(),
            "http://169.254.169.254/latest/meta-data/"
        );
        assert_eq!(
            Provider::Azure.endpoint(),
            "http://169.254.169.254/metadata/instance?api-version=2020-09-01"
        );
        assert_eq!(
            Provider::Gcp.endpoint(),
            "http://metadata.google.internal/computeMetadata/v1/"
        );
    }

    #[test]
    fn test_default_headers() {
        assert!(Provider::Aws.default_headers().is_empty());

        let azure = Provider::Azure.default_headers();
        assert_eq!(azure.len(), 1);
        assert_eq!(azure.get("Metadata").unwrap(), "true");

        let gcp = Provider::Gcp.default_headers();
        assert_eq!(gcp.len(), 1);
        assert_eq!(gcp.get("Metadata-Flavor").unwrap(), "Google");
    }

    #[test]
    fn test_only_azure_decodes_json() {
        assert_eq!(Provider::Aws.decoding(), ResponseDecoding::Text);
        assert_eq!(Provider::Azure.decoding(), ResponseDecoding::Json);
        assert_eq!(Provider::Gcp.decoding(), ResponseDecoding::Text);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Provider::Aws).unwrap(), "\"AWS\"");
        assert_eq!(
            serde_json::from_str::<Provider>("\"Azure\"").unwrap(),
            Provider::Azure
        );
        assert_eq!(Provider::Gcp.to_string(), "GCP");
    }

    #[test]
    fn test_value_enum_names() {
        assert_eq!(Provider::from_str("AWS", false).unwrap(), Provider::Aws);
        assert_eq!(Provider::from_str("gcp", true).unwrap(), Provider::Gcp);
        assert!(Provider::from_str("aws", false).is_err());
    }
}
