//! Identifiers shared by discovery and detail resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Bamboo build number (treated as a string for maximum compatibility).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildNumber(String);

impl BuildNumber {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bamboo reports `0` for plans that have never run.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.0 == "0"
    }
}

impl fmt::Display for BuildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BuildNumber {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BuildNumber {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// A configured Bamboo server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Base URL, possibly carrying `user:key@` credentials.
    pub url: String,
    /// Display name shown on dashboards.
    pub nice_name: Option<String>,
}

/// A plan (or the parent plan of a branch) on one instance.
///
/// Equality and hashing cover all three fields, so the same plan discovered in
/// two crawls yields the same map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BambooJob {
    pub instance_url: String,
    pub job_name: String,
    pub job_url: String,
}

impl BambooJob {
    #[must_use]
    pub fn new(
        instance_url: impl Into<String>,
        job_name: impl Into<String>,
        job_url: impl Into<String>,
    ) -> Self {
        Self {
            instance_url: instance_url.into(),
            job_name: job_name.into(),
            job_url: job_url.into(),
        }
    }
}
