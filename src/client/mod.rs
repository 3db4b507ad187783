//! Blocking Bamboo client: settings, credentials and the HTTP transport.

pub mod blocking_client;

pub use blocking_client::{BlockingClient, BlockingClientBuilder};
