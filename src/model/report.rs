use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::provider::Provider;

/// Outcome of probing a single provider.
///
/// On success `data` holds the response body; on failure it holds a
/// human-readable description of what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub success: bool,
    pub data: String,
}

impl ProbeResult {
    pub fn success(data: impl Into<String>) -> Self {
        Self {
            success: true,
            data: data.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: message.into(),
        }
    }
}

/// Results of a scan, keyed by provider.
///
/// Entries keep the order in which providers were first inserted and
/// serialize as a JSON object keyed by the provider's display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    entries: Vec<(Provider, ProbeResult)>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result. A provider already present keeps its position and
    /// has its result replaced.
    pub fn insert(&mut self, provider: Provider, result: ProbeResult) {
        match self.entries.iter_mut().find(|(p, _)| *p == provider) {
            Some((_, existing)) => *existing = result,
            None => self.entries.push((provider, result)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Provider, &ProbeResult)> {
        self.entries.iter().map(|(p, r)| (*p, r))
    }

    /// Providers whose metadata endpoint answered.
    pub fn exposed(&self) -> impl Iterator<Item = Provider> + '_ {
        self.iter().filter(|(_, r)| r.success).map(|(p, _)| p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
impl ScanReport {
    pub fn get(&self, provider: Provider) -> Option<&ProbeResult> {
        self.entries
            .iter()
            .find(|(p, _)| *p == provider)
            .map(|(_, r)| r)
    }

    pub fn providers(&self) -> Vec<Provider> {
        self.entries.iter().map(|(p, _)| *p).collect()
    }
}

impl Serialize for ScanReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (provider, result) in &self.entries {
            map.serialize_entry(provider, result)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScanReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReportVisitor;

        impl<'de> Visitor<'de> for ReportVisitor {
            type Value = ScanReport;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of provider name to probe result")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut report = ScanReport::new();
                while let Some((provider, result)) = access.next_entry::<Provider, ProbeResult>()? {
                    report.insert(provider, result);
                }
                Ok(report)
            }
        }

        deserializer.deserialize_map(ReportVisitor)
    }
}
