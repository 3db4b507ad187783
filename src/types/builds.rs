//! Build summaries and details.

use crate::BuildNumber;
use serde::{Deserialize, Serialize};

/// Normalized terminal state of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildStatus {
    Success,
    Unstable,
    Failure,
    Aborted,
    Unknown,
}

impl BuildStatus {
    /// Maps Bamboo's `buildState`. Matching is exact and case-sensitive.
    #[must_use]
    pub fn from_build_state(state: &str) -> Self {
        match state {
            "Successful" => Self::Success,
            "UNSTABLE" => Self::Unstable,
            "Failed" => Self::Failure,
            "ABORTED" => Self::Aborted,
            _ => Self::Unknown,
        }
    }
}

/// One source-control change attached to a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScmChange {
    pub scm_author: Option<String>,
    pub scm_commit_log: Option<String>,
    /// Epoch millis; `0` when the server sent no usable date.
    pub scm_commit_timestamp: i64,
    pub scm_revision_number: Option<String>,
    pub scm_url: Option<String>,
    pub number_of_changes: usize,
}

/// A build as discovered (number + URL only) or fully resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub number: BuildNumber,
    pub build_url: String,
    /// When the details were captured, epoch millis.
    pub timestamp: i64,
    pub start_time: i64,
    pub duration: i64,
    pub end_time: i64,
    pub build_status: Option<BuildStatus>,
    pub log: Option<String>,
    /// Full name of the first culprit, when Bamboo reports any.
    pub culprit: Option<String>,
    pub source_change_set: Vec<ScmChange>,
}

impl Build {
    /// A discovery-time summary; everything but number and URL stays empty.
    #[must_use]
    pub fn summary(number: impl Into<BuildNumber>, build_url: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            build_url: build_url.into(),
            ..Self::default()
        }
    }
}
