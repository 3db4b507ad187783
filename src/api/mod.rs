//! Bamboo REST workflows built on [`crate::BlockingClient`].

pub mod builds;
pub mod plans;

pub use builds::BuildsService;
pub use plans::PlansService;
