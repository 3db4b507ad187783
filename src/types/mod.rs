//! Shared job/build types handed to the persistence layer.

pub mod builds;
pub mod common;
pub mod jobs;

pub use builds::*;
pub use common::*;
pub use jobs::*;
