//! Probing of cloud instance-metadata endpoints.
//!
//! Each provider is attempted with a single bounded GET. Redirects are never
//! followed and any non-2xx answer counts as a failure. A failed probe is
//! recorded in the report and never stops the scan.

mod error;

use std::time::Duration;

use reqwest::header::{HeaderMap, LOCATION};
use reqwest::redirect::Policy;
use tracing::{error, info};

use crate::config::{EndpointOverrides, ScanConfig};
use crate::model::{ProbeResult, Provider, ResponseDecoding, ScanReport};

pub use error::ProbeError;

#[derive(Clone, Debug)]
pub struct MetadataProber {
    client: reqwest::Client,
    endpoints: EndpointOverrides,
}

impl MetadataProber {
    /// Creates a prober that sends `user_agent` and gives up on each request
    /// after `timeout`.
    pub fn new(timeout: Duration, user_agent: &str) -> reqwest::Result<Self> {
        // The probe must originate from this host, so ignore proxy env vars.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(Policy::none())
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            endpoints: EndpointOverrides::default(),
        })
    }

    pub fn from_config(config: &ScanConfig) -> reqwest::Result<Self> {
        Ok(Self::new(config.timeout, &config.user_agent)?.with_endpoints(config.endpoints.clone()))
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: EndpointOverrides) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// URL probed for `provider`: the override if one is set, else the
    /// provider's well-known endpoint.
    pub fn endpoint(&self, provider: Provider) -> &str {
        self.endpoints
            .get(provider)
            .unwrap_or_else(|| provider.endpoint())
    }

    /// Probe one provider with its required headers.
    pub async fn probe(&self, provider: Provider) -> ProbeResult {
        self.probe_with_headers(provider, None).await
    }

    /// Probe one provider. Explicit `headers` replace the provider's
    /// required header instead of adding to it.
    pub async fn probe_with_headers(
        &self,
        provider: Provider,
        headers: Option<HeaderMap>,
    ) -> ProbeResult {
        let url = self.endpoint(provider);
        info!(provider = provider.id(), "Attempting to access {provider} metadata endpoint: {url}");

        match self.fetch(provider, url, headers).await {
            Ok(data) => {
                info!(provider = provider.id(), "Successfully accessed {provider} metadata.");
                ProbeResult::success(data)
            }
            Err(err) => {
                error!(provider = err.provider().id(), "{err}");
                ProbeResult::failure(err.to_string())
            }
        }
    }

    /// Probe `providers` one after another, in the given order.
    pub async fn probe_many(&self, providers: &[Provider]) -> ScanReport {
        let mut report = ScanReport::new();
        for &provider in providers {
            let result = self.probe(provider).await;
            report.insert(provider, result);
        }
        report
    }

    /// Probe every provider in the default order.
    pub async fn probe_all(&self) -> ScanReport {
        self.probe_many(&Provider::ALL).await
    }

    async fn fetch(
        &self,
        provider: Provider,
        url: &str,
        headers: Option<HeaderMap>,
    ) -> Result<String, ProbeError> {
        let headers = headers.unwrap_or_else(|| provider.default_headers());

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|source| ProbeError::Request { provider, source })?;

        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            return Err(ProbeError::Redirect {
                provider,
                status,
                location,
            });
        }
        if !status.is_success() {
            return Err(ProbeError::Status {
                provider,
                status,
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ProbeError::Body { provider, source })?;

        match provider.decoding() {
            ResponseDecoding::Text => Ok(body),
            ResponseDecoding::Json => serde_json::from_str::<serde_json::Value>(&body)
                .and_then(|value| serde_json::to_string(&value))
                .map_err(|source| ProbeError::Decode { provider, source }),
        }
    }
}
