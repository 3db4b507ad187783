//! Bamboo build collector: discovers plans, branches and builds on a Bamboo
//! server and normalizes build details for persistence.
//!
//! ```no_run
//! use bamboo_collector::{BlockingClient, CollectorSettings};
//!
//! # fn main() -> Result<(), bamboo_collector::Error> {
//! let settings = CollectorSettings::new()
//!     .server("https://bamboo.example.com")
//!     .credentials("ci-bot", "api-key");
//! let client = BlockingClient::new(settings)?;
//!
//! for instance in client.settings().instances() {
//!     for (job, builds) in client.plans().instance_jobs(&instance.url)? {
//!         for summary in builds {
//!             if let Some(build) = client.builds().details(&summary.build_url, &instance.url) {
//!                 println!("{} #{}: {:?}", job.job_name, build.number, build.build_status);
//!             }
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod json;
pub mod transport;
pub mod types;
pub mod util;

pub use auth::{Credentials, SecretString};
pub use client::{BlockingClient, BlockingClientBuilder};
pub use config::CollectorSettings;
pub use error::{BodySnippetConfig, Error, ErrorKind, HttpError, Result, TransportErrorKind};
pub use transport::{BlockingTransport, DynBlockingTransport, TransportRequest, TransportResponse};
pub use types::*;
