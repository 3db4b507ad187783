//! URL composition and error-reporting helpers.

pub(crate) mod diagnostics;
pub(crate) mod redact;
pub mod url;

pub use self::url::{join_url, rebuild_job_url, rewrite_localhost};
