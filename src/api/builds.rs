//! Full build details for one discovered build.

use crate::{
    BlockingClient, Build, BuildNumber, Error, json,
    util::url::{join_url, rebuild_job_url},
};
use chrono::Utc;
use serde_json::Value;

const BUILD_DETAILS_URL_SUFFIX: &str =
    "?expand=results.result.artifacts&expand=changes.change.files";

/// Resolves build summaries into reportable builds.
#[derive(Clone)]
pub struct BuildsService {
    client: BlockingClient,
}

impl BuildsService {
    pub(crate) fn new(client: BlockingClient) -> Self {
        Self { client }
    }

    /// Fully populated build, or `None` if it is still running or anything
    /// went wrong; failures are logged, never returned half-filled.
    #[must_use]
    pub fn details(&self, build_url: &str, instance_url: &str) -> Option<Build> {
        match self.try_details(build_url, instance_url) {
            Ok(build) => build,
            Err(err) => {
                #[cfg(feature = "metrics")]
                crate::transport::metrics::record_skipped_build("error");
                match &err {
                    Error::InvalidUrl { .. } | Error::UrlEncoding { .. } => {
                        tracing::error!(build_url, error = %err, "malformed url for loading build details");
                    }
                    err if err.is_transport_failure() => {
                        tracing::error!(build_url, error = %err, "client exception loading build details");
                    }
                    _ => {
                        tracing::error!(build_url, error = %err, "parsing build");
                    }
                }
                None
            }
        }
    }

    /// Like [`Self::details`] but hands the failure back instead of logging it.
    ///
    /// `Ok(None)` means the build has not finished yet.
    pub fn try_details(&self, build_url: &str, instance_url: &str) -> Result<Option<Build>, Error> {
        let rebuilt = rebuild_job_url(build_url, instance_url)?;
        let url = join_url(&rebuilt, [BUILD_DETAILS_URL_SUFFIX]);
        tracing::debug!(build_url, "fetching build details");

        let body = self.client.fetch(&url)?;
        if body.is_empty() {
            return Err(Error::parse(build_url, "empty build details response"));
        }
        let payload = self.client.parse_json(&body, &url, build_url)?;

        if payload.get("finished").and_then(Value::as_bool) != Some(true) {
            tracing::debug!(build_url, "build still running, skipping");
            #[cfg(feature = "metrics")]
            crate::transport::metrics::record_skipped_build("unfinished");
            return Ok(None);
        }

        let mut build = build_from_payload(build_url, &payload)?;
        if self.client.settings().save_log {
            build.log = Some(self.client.fetch_log(build_url)?);
        }
        Ok(Some(build))
    }
}

/// Normalizes a finished build's payload; `build_url` is kept as discovered.
pub(crate) fn build_from_payload(build_url: &str, payload: &Value) -> Result<Build, Error> {
    let started = json::require_str(payload, "buildStartedTime", build_url)?;
    let start_time = json::parse_iso_offset_millis(started).ok_or_else(|| {
        Error::parse(build_url, format!("unparsable buildStartedTime `{started}`"))
    })?;
    let duration = json::require_i64(payload, "buildDuration", build_url)?;

    Ok(Build {
        number: BuildNumber::new(json::require_scalar(payload, "buildNumber", build_url)?),
        build_url: build_url.to_owned(),
        timestamp: Utc::now().timestamp_millis(),
        start_time,
        duration,
        end_time: start_time.saturating_add(duration),
        build_status: Some(json::build_status(payload)),
        log: None,
        culprit: json::first_culprit(payload),
        source_change_set: json::change_sets(payload),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BuildStatus;
    use serde_json::json;

    const BUILD_URL: &str = "http://bamboo.test/rest/api/latest/result/PROJ-PLAN/7";

    fn finished_payload() -> Value {
        json!({
            "finished": true,
            "buildNumber": 7,
            "buildState": "Failed",
            "buildStartedTime": "2016-06-23T09:13:29.961+07:00",
            "buildDuration": 60000,
            "culprits": [{"fullName": "Ada Lovelace"}],
            "changes": {"change": [
                {
                    "author": "Ada Lovelace",
                    "comment": "Break the build",
                    "changesetId": "9f1c2d",
                    "date": "2016-06-23 09:10:00 +0700",
                    "commitUrl": "https://git.example.com/c/9f1c2d",
                    "files": {"file": [{"name": "src/lib.rs"}]}
                },
                {
                    "user": "grace",
                    "comment": "Revert",
                    "revision": 4212,
                    "timestamp": 1466648000000_i64
                }
            ]}
        })
    }

    #[test]
    fn build_from_payload_populates_details() {
        let build = build_from_payload(BUILD_URL, &finished_payload()).unwrap();

        assert_eq!(build.number.as_str(), "7");
        assert_eq!(build.build_url, BUILD_URL);
        assert_eq!(build.start_time, 1_466_648_009_961);
        assert_eq!(build.duration, 60_000);
        assert_eq!(build.end_time, 1_466_648_069_961);
        assert_eq!(build.build_status, Some(BuildStatus::Failure));
        assert_eq!(build.culprit.as_deref(), Some("Ada Lovelace"));
        assert!(build.timestamp > 0);
        assert_eq!(build.log, None);

        assert_eq!(build.source_change_set.len(), 2);
        let first = &build.source_change_set[0];
        assert_eq!(first.scm_revision_number.as_deref(), Some("9f1c2d"));
        assert_eq!(first.number_of_changes, 1);
        let second = &build.source_change_set[1];
        assert_eq!(second.scm_author.as_deref(), Some("grace"));
        assert_eq!(second.scm_revision_number.as_deref(), Some("4212"));
        assert_eq!(second.scm_commit_timestamp, 1_466_648_000_000);
        assert_eq!(second.number_of_changes, 0);
    }

    #[test]
    fn build_from_payload_rejects_bad_start_time() {
        let mut payload = finished_payload();
        payload["buildStartedTime"] = json!("23/06/2016");
        let err = build_from_payload(BUILD_URL, &payload).unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[test]
    fn build_from_payload_requires_duration() {
        let mut payload = finished_payload();
        payload.as_object_mut().unwrap().remove("buildDuration");
        assert!(build_from_payload(BUILD_URL, &payload).is_err());
    }

    #[test]
    fn unknown_build_state_maps_to_unknown() {
        let mut payload = finished_payload();
        payload["buildState"] = json!("weird-status");
        let build = build_from_payload(BUILD_URL, &payload).unwrap();
        assert_eq!(build.build_status, Some(BuildStatus::Unknown));
    }
}
