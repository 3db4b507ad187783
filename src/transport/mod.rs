//! HTTP transport seam.
//!
//! The collector only ever issues `GET`s; a transport turns one
//! [`TransportRequest`] into one [`TransportResponse`] and reports network
//! failures as [`crate::Error::Transport`].

pub mod blocking_transport;
#[cfg(feature = "metrics")]
pub(crate) mod metrics;

use http::{HeaderMap, StatusCode};
use std::time::Duration;
use url::Url;

pub use blocking_transport::{BlockingTransport, DynBlockingTransport, UreqBlocking};

#[derive(Clone, Debug)]
pub struct TransportRequest {
    /// Absolute URL, user-info already stripped.
    pub url: Url,
    pub headers: HeaderMap,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    #[must_use]
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
