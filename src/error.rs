use http::StatusCode;
use std::{error::Error as StdError, fmt};
use thiserror::Error;
use url::Url;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy)]
pub struct BodySnippetConfig {
    pub enabled: bool,
    pub max_bytes: usize,
}

impl Default for BodySnippetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_bytes: 4096,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    Auth,
    NotFound,
    Api,
    Transport,
    InvalidUrl,
    UrlEncoding,
    Decode,
    Parse,
    InvalidConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    /// Sanitized URL: no query/fragment/userinfo.
    pub url: Box<Url>,
    pub message: Option<Box<str>>,
    pub request_id: Option<Box<str>>,
    pub body_snippet: Option<Box<str>>,
}

impl HttpError {
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

/// All errors returned by the collector.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("{0}")]
    Auth(HttpError),

    #[error("{0}")]
    NotFound(HttpError),

    #[error("{0}")]
    Api(HttpError),

    #[error("Transport error during GET {path}: {source}")]
    Transport {
        path: Box<str>,
        kind: TransportErrorKind,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Malformed URL: {source}")]
    InvalidUrl {
        #[source]
        source: url::ParseError,
    },

    #[error("URL is not valid percent-encoded UTF-8: {source}")]
    UrlEncoding {
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Decode error for {context}: {source}")]
    Decode {
        context: Box<str>,
        body_snippet: Option<Box<str>>,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected payload for {context}: {message}")]
    Parse {
        context: Box<str>,
        message: Box<str>,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: Box<str>,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(_) => ErrorKind::Auth,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Api(_) => ErrorKind::Api,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::UrlEncoding { .. } => ErrorKind::UrlEncoding,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Auth(e) | Self::NotFound(e) | Self::Api(e) => Some(e.status),
            _ => None,
        }
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Auth(e) | Self::NotFound(e) | Self::Api(e) => e.request_id.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Client/server communication failed: the instance is unreachable or
    /// refused the request. Discovery aborts on these.
    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::Auth(_) | Self::NotFound(_) | Self::Api(_) | Self::Transport { .. }
        )
    }

    /// The server answered, but not with the JSON shape we expect.
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Parse { .. })
    }

    pub(crate) fn from_http(error: HttpError) -> Self {
        match error.status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth(error),
            StatusCode::NOT_FOUND => Self::NotFound(error),
            _ => Self::Api(error),
        }
    }

    pub(crate) fn parse(context: impl Into<Box<str>>, message: impl Into<Box<str>>) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.into(),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(source: url::ParseError) -> Self {
        Self::InvalidUrl { source }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} (GET {})", self.status, self.path())?;
        if let Some(message) = self.message.as_deref() {
            write!(f, ": {message}")?;
        }
        if let Some(request_id) = self.request_id.as_deref() {
            write!(f, " [request-id: {request_id}]")?;
        }
        Ok(())
    }
}
