//! High-level blocking Bamboo client.

use crate::{
    BodySnippetConfig, CollectorSettings, Credentials, Error, HttpError, api,
    auth::resolve_credentials,
    transport::{DynBlockingTransport, TransportRequest, TransportResponse, UreqBlocking},
    util::{
        diagnostics,
        redact::redact_text,
        url::{join_url, sanitize_url_for_error, strip_user_info},
    },
};
use http::HeaderMap;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::field;
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Configures and constructs [`BlockingClient`].
pub struct BlockingClientBuilder {
    settings: CollectorSettings,
    insecure: bool,
    user_agent: String,
    timeout: Duration,
    connect_timeout: Duration,
    read_timeout: Duration,
    no_proxy: bool,
    default_headers: HeaderMap,
    body_snippet: BodySnippetConfig,
    transport: Option<DynBlockingTransport>,
}

impl BlockingClientBuilder {
    fn new(settings: CollectorSettings) -> Self {
        Self {
            settings,
            insecure: false,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            no_proxy: false,
            default_headers: HeaderMap::new(),
            body_snippet: BodySnippetConfig::default(),
            transport: None,
        }
    }

    pub fn no_system_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    pub fn danger_accept_invalid_certs(mut self, yes: bool) -> Self {
        self.insecure = yes;
        self
    }

    /// Override the default `User-Agent` header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = value;
        self
    }

    pub fn connect_timeout(mut self, value: Duration) -> Self {
        self.connect_timeout = value;
        self
    }

    pub fn read_timeout(mut self, value: Duration) -> Self {
        self.read_timeout = value;
        self
    }

    pub fn default_header(
        mut self,
        name: http::header::HeaderName,
        value: http::HeaderValue,
    ) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    pub fn capture_body_snippet(mut self, enabled: bool) -> Self {
        self.body_snippet.enabled = enabled;
        self
    }

    pub fn max_body_snippet_bytes(mut self, max_bytes: usize) -> Self {
        self.body_snippet.max_bytes = max_bytes;
        self
    }

    /// Swap out the underlying transport; timeouts and TLS knobs then belong
    /// to that transport.
    pub fn transport(mut self, transport: DynBlockingTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<BlockingClient, Error> {
        let transport: DynBlockingTransport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(UreqBlocking::try_new(
                self.insecure,
                &self.user_agent,
                self.timeout,
                self.connect_timeout,
                self.read_timeout,
                self.no_proxy,
            )?),
        };

        Ok(BlockingClient {
            inner: Arc::new(Inner {
                fallback: self.settings.fallback_credentials(),
                settings: self.settings,
                timeout: self.timeout,
                default_headers: self.default_headers,
                body_snippet: self.body_snippet,
                transport,
            }),
        })
    }
}

/// Cheap to clone; clones share settings and transport.
#[derive(Clone)]
pub struct BlockingClient {
    inner: Arc<Inner>,
}

struct Inner {
    settings: CollectorSettings,
    fallback: Option<Credentials>,
    timeout: Duration,
    default_headers: HeaderMap,
    body_snippet: BodySnippetConfig,
    transport: DynBlockingTransport,
}

impl BlockingClient {
    #[must_use]
    pub fn builder(settings: CollectorSettings) -> BlockingClientBuilder {
        BlockingClientBuilder::new(settings)
    }

    pub fn new(settings: CollectorSettings) -> Result<Self, Error> {
        Self::builder(settings).build()
    }

    #[must_use]
    pub fn settings(&self) -> &CollectorSettings {
        &self.inner.settings
    }

    /// Plan/branch discovery.
    #[must_use]
    pub fn plans(&self) -> api::PlansService {
        api::PlansService::new(self.clone())
    }

    /// Single-build detail resolution.
    #[must_use]
    pub fn builds(&self) -> api::BuildsService {
        api::BuildsService::new(self.clone())
    }

    /// One authenticated `GET`, returning the body as text.
    ///
    /// User-info in `url` takes precedence over the configured username/API
    /// key. Non-2xx answers are errors.
    pub fn fetch(&self, url: &str) -> Result<String, Error> {
        let url = Url::parse(url)?;
        let credentials = resolve_credentials(&url, self.inner.fallback.as_ref());
        let resp = self.execute(&url, credentials.as_ref())?;
        Ok(resp.text_lossy())
    }

    /// `{build_url}/consoleText`; a malformed URL yields an empty log.
    pub fn fetch_log(&self, build_url: &str) -> Result<String, Error> {
        match self.fetch(&join_url(build_url, ["consoleText"])) {
            Err(Error::InvalidUrl { source }) => {
                tracing::error!(error = %source, "malformed url for build log");
                Ok(String::new())
            }
            other => other,
        }
    }

    pub(crate) fn fetch_json(&self, url: &str, context: &str) -> Result<Value, Error> {
        let body = self.fetch(url)?;
        self.parse_json(&body, url, context)
    }

    pub(crate) fn parse_json(&self, body: &str, url: &str, context: &str) -> Result<Value, Error> {
        serde_json::from_str(body).map_err(|source| {
            let credentials = Url::parse(url)
                .ok()
                .and_then(|u| resolve_credentials(&u, self.inner.fallback.as_ref()));
            Error::Decode {
                context: context.into(),
                body_snippet: diagnostics::body_snippet(
                    body.as_bytes(),
                    self.inner.body_snippet,
                    credentials.as_ref(),
                ),
                source,
            }
        })
    }

    fn execute(
        &self,
        url: &Url,
        credentials: Option<&Credentials>,
    ) -> Result<TransportResponse, Error> {
        #[cfg(feature = "metrics")]
        let _inflight = crate::transport::metrics::InFlightGuard::new();

        let mut headers = self.inner.default_headers.clone();
        if let Some(credentials) = credentials {
            credentials.apply(&mut headers)?;
        }

        let start = std::time::Instant::now();
        let span = tracing::info_span!(
            "bamboo.request",
            http.method = "GET",
            http.host = %url.host_str().unwrap_or_default(),
            http.path = %url.path(),
            http.status = field::Empty,
            request_id = field::Empty,
            latency_ms = field::Empty,
            error_kind = field::Empty,
        );
        let _enter = span.enter();

        let resp = match self.inner.transport.send(TransportRequest {
            url: strip_user_info(url),
            headers,
            timeout: self.inner.timeout,
        }) {
            Ok(resp) => resp,
            Err(err) => {
                #[cfg(feature = "metrics")]
                crate::transport::metrics::record_outcome(
                    err.status(),
                    start.elapsed(),
                    Some(err.kind()),
                );
                span.record("error_kind", field::debug(err.kind()));
                span.record("latency_ms", start.elapsed().as_millis() as i64);
                return Err(err);
            }
        };

        let request_id = diagnostics::request_id(&resp.headers);
        span.record("http.status", resp.status.as_u16() as i64);
        span.record("latency_ms", start.elapsed().as_millis() as i64);
        if let Some(rid) = request_id.as_deref() {
            span.record("request_id", field::display(rid));
        }

        if resp.status.is_client_error() || resp.status.is_server_error() {
            let message = diagnostics::extract_message(&resp.body)
                .map(|msg| redact_text(msg.into(), credentials).into_boxed_str());
            let err = Error::from_http(HttpError {
                status: resp.status,
                url: Box::new(sanitize_url_for_error(url)),
                message,
                request_id,
                body_snippet: diagnostics::body_snippet(
                    &resp.body,
                    self.inner.body_snippet,
                    credentials,
                ),
            });

            #[cfg(feature = "metrics")]
            crate::transport::metrics::record_outcome(
                err.status(),
                start.elapsed(),
                Some(err.kind()),
            );
            span.record("error_kind", field::debug(err.kind()));

            return Err(err);
        }

        #[cfg(feature = "metrics")]
        crate::transport::metrics::record_outcome(Some(resp.status), start.elapsed(), None);

        tracing::debug!(bytes = resp.body.len(), "response received");
        Ok(resp)
    }
}
