use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::query::{CREDIBLE_DOMAINS, WIKIPEDIA_DOMAIN};
use crate::RetrievalError;

/// The closed set of external knowledge backends.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttributionSource {
    GoogleVanilla,
    GoogleCredible,
    Wikipedia,
}

impl AttributionSource {
    pub const ALL: [AttributionSource; 3] = [
        AttributionSource::GoogleVanilla,
        AttributionSource::GoogleCredible,
        AttributionSource::Wikipedia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributionSource::GoogleVanilla => "google_vanilla",
            AttributionSource::GoogleCredible => "google_credible",
            AttributionSource::Wikipedia => "wikipedia",
        }
    }

    /// Search clause prepended to every query for this backend.
    pub fn site_restriction(&self) -> Option<&'static str> {
        match self {
            AttributionSource::GoogleVanilla => None,
            AttributionSource::GoogleCredible => Some(CREDIBLE_DOMAINS),
            AttributionSource::Wikipedia => Some(WIKIPEDIA_DOMAIN),
        }
    }
}

impl fmt::Display for AttributionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributionSource {
    type Err = RetrievalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        AttributionSource::ALL
            .into_iter()
            .find(|source| source.as_str() == value)
            .ok_or_else(|| RetrievalError::UnknownSource(value.to_string()))
    }
}
