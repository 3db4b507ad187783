use crate::ErrorKind;
use http::StatusCode;
use std::time::Duration;

pub(crate) struct InFlightGuard {
    gauge: metrics::Gauge,
}

impl InFlightGuard {
    pub(crate) fn new() -> Self {
        let gauge = metrics::gauge!("bamboo_collector_inflight");
        gauge.increment(1.0);
        Self { gauge }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.decrement(1.0);
    }
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

fn error_kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Auth => "auth",
        ErrorKind::NotFound => "not_found",
        ErrorKind::Api => "api",
        ErrorKind::Transport => "transport",
        ErrorKind::InvalidUrl => "invalid_url",
        ErrorKind::UrlEncoding => "url_encoding",
        ErrorKind::Decode => "decode",
        ErrorKind::Parse => "parse",
        ErrorKind::InvalidConfig => "invalid_config",
    }
}

pub(crate) fn record_outcome(
    status: Option<StatusCode>,
    latency: Duration,
    error_kind: Option<ErrorKind>,
) {
    let status_class = status.map(status_class).unwrap_or("transport");

    metrics::counter!(
        "bamboo_collector_requests_total",
        "status_class" => status_class
    )
    .increment(1);
    metrics::histogram!(
        "bamboo_collector_request_duration_seconds",
        "status_class" => status_class
    )
    .record(latency);

    if let Some(kind) = error_kind {
        metrics::counter!(
            "bamboo_collector_errors_total",
            "kind" => error_kind_label(kind)
        )
        .increment(1);
    }
}

/// Builds skipped or dropped while resolving details, by reason.
pub(crate) fn record_skipped_build(reason: &'static str) {
    metrics::counter!("bamboo_collector_builds_skipped_total", "reason" => reason).increment(1);
}
