//! Defensive field extraction over Bamboo's loosely shaped JSON.
//!
//! Everything here is a pure function over [`serde_json::Value`]: absent keys
//! and unexpected types degrade to `None`, an empty slice, or `0` rather than
//! an error. Callers that need a field to exist use the `require_*` helpers.

use crate::{BuildStatus, Error, ScmChange};
use chrono::DateTime;
use serde_json::Value;

/// Bamboo's timestamps: ISO-8601 with exactly three fractional digits and a
/// colon-separated offset, e.g. `2016-06-23T09:13:29.961+07:00`.
const ISO_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%3f%:z";

/// Git-style commit date with a numeric offset, e.g.
/// `2016-06-23 09:13:29 +0700`.
const ALTERNATE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// String value of `key`, `None` if absent or not a string.
#[must_use]
pub fn get_string<'a>(obj: &'a Value, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

/// Array value of `key`; never fails, an absent key reads as empty.
#[must_use]
pub fn get_array<'a>(obj: &'a Value, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Bamboo's collection envelope: `{"plans": {"plan": [...]}}`.
#[must_use]
pub fn get_nested_array<'a>(obj: &'a Value, outer: &str, inner: &str) -> &'a [Value] {
    obj.get(outer).map(|v| get_array(v, inner)).unwrap_or_default()
}

/// Scalar rendered as text: strings as-is, numbers and booleans stringified.
#[must_use]
pub fn get_scalar_string(obj: &Value, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn require_str<'a>(obj: &'a Value, key: &str, context: &str) -> Result<&'a str, Error> {
    get_string(obj, key).ok_or_else(|| Error::parse(context, format!("missing string `{key}`")))
}

pub(crate) fn require_scalar(obj: &Value, key: &str, context: &str) -> Result<String, Error> {
    get_scalar_string(obj, key).ok_or_else(|| Error::parse(context, format!("missing `{key}`")))
}

pub(crate) fn require_i64(obj: &Value, key: &str, context: &str) -> Result<i64, Error> {
    obj.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::parse(context, format!("missing integer `{key}`")))
}

/// Parses an ISO-8601 timestamp with millisecond precision and an offset
/// (`2016-06-23T09:13:29.961+07:00`, or `Z` for UTC) into epoch millis.
///
/// Values without milliseconds or with a space instead of `T` are rejected.
#[must_use]
pub fn parse_iso_offset_millis(raw: &str) -> Option<i64> {
    let normalized = match raw.strip_suffix('Z') {
        Some(local) => format!("{local}+00:00"),
        None => raw.to_owned(),
    };
    DateTime::parse_from_str(&normalized, ISO_DATE_FORMAT)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Commit time in epoch millis.
///
/// Numeric `timestamp` wins; otherwise `date` is tried as ISO-8601 and then in
/// the alternate git format. Returns `0` when nothing usable is present.
#[must_use]
pub fn commit_timestamp(item: &Value) -> i64 {
    if let Some(ts) = item.get("timestamp").and_then(Value::as_i64) {
        return ts;
    }
    let Some(date) = get_string(item, "date") else {
        return 0;
    };
    if let Some(millis) = parse_iso_offset_millis(date) {
        return millis;
    }
    match DateTime::parse_from_str(date, ALTERNATE_DATE_FORMAT) {
        Ok(dt) => dt.timestamp_millis(),
        Err(err) => {
            tracing::error!(date, error = %err, "invalid commit date string");
            0
        }
    }
}

/// Numeric `revision` stringified, else the `changesetId` string.
#[must_use]
pub fn revision(item: &Value) -> Option<String> {
    match item.get("revision") {
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => get_string(item, "changesetId").map(ToOwned::to_owned),
    }
}

/// Author object's `fullName`, else the flat `user` field.
///
/// Bamboo also sends `author` as a plain name string; that is taken verbatim.
#[must_use]
pub fn commit_author(item: &Value) -> Option<String> {
    match item.get("author") {
        Some(author @ Value::Object(_)) => get_string(author, "fullName").map(ToOwned::to_owned),
        Some(Value::String(name)) => Some(name.clone()),
        _ => get_string(item, "user").map(ToOwned::to_owned),
    }
}

/// `fullName` of the first entry in `culprits`.
#[must_use]
pub fn first_culprit(build: &Value) -> Option<String> {
    get_array(build, "culprits")
        .first()
        .and_then(|culprit| get_string(culprit, "fullName"))
        .map(ToOwned::to_owned)
}

/// Status from the build's `buildState`; absent reads as unknown.
#[must_use]
pub fn build_status(build: &Value) -> BuildStatus {
    get_string(build, "buildState").map_or(BuildStatus::Unknown, BuildStatus::from_build_state)
}

/// One `changes.change[]` entry.
#[must_use]
pub fn scm_change(item: &Value) -> ScmChange {
    ScmChange {
        scm_author: commit_author(item),
        scm_commit_log: get_string(item, "comment").map(ToOwned::to_owned),
        scm_commit_timestamp: commit_timestamp(item),
        scm_revision_number: revision(item),
        scm_url: get_string(item, "commitUrl").map(ToOwned::to_owned),
        number_of_changes: get_nested_array(item, "files", "file").len(),
    }
}

/// All change-sets of a build, in server order.
#[must_use]
pub fn change_sets(build: &Value) -> Vec<ScmChange> {
    get_nested_array(build, "changes", "change")
        .iter()
        .map(scm_change)
        .collect()
}
