use crate::Error;
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use http::{
    HeaderMap, HeaderValue,
    header::{ACCEPT, AUTHORIZATION},
};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use std::fmt;
use url::Url;

#[derive(Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Basic-Auth credential pair.
///
/// `key` is `None` when a URL carries only a user name (`http://user@host`);
/// the header then encodes the bare user name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub key: Option<SecretString>,
}

impl Credentials {
    #[must_use]
    pub fn basic(user: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            key: Some(SecretString::new(key)),
        }
    }

    /// User-info embedded in `url`, percent-decoded.
    #[must_use]
    pub fn from_url(url: &Url) -> Option<Self> {
        let user = decode(url.username());
        let key = url.password().map(|p| SecretString::new(decode(p)));
        if user.is_empty() && key.is_none() {
            return None;
        }
        Some(Self { user, key })
    }

    pub(crate) fn secrets(&self) -> Vec<&str> {
        self.key.iter().map(SecretString::expose).collect()
    }

    pub(crate) fn header_value(&self) -> Result<HeaderValue, Error> {
        let user_info = match &self.key {
            Some(key) => format!("{}:{}", self.user, key.expose()),
            None => self.user.clone(),
        };
        let raw = format!("Basic {}", B64.encode(user_info));
        HeaderValue::from_str(&raw).map_err(|err| Error::InvalidConfig {
            message: "invalid Authorization header value".into(),
            source: Some(Box::new(err)),
        })
    }

    /// Inserts `Authorization` and `Accept: application/json`.
    pub(crate) fn apply(&self, headers: &mut HeaderMap) -> Result<(), Error> {
        headers.insert(AUTHORIZATION, self.header_value()?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(())
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Picks the credentials for one request: URL user-info wins over the
/// configured fallback; neither means an anonymous request.
#[must_use]
pub fn resolve_credentials(url: &Url, fallback: Option<&Credentials>) -> Option<Credentials> {
    Credentials::from_url(url).or_else(|| fallback.cloned())
}
