//! Pipelines.
//!
//! The [expand::Expand] pipeline generates expanded (or randomized) probe datasets,
//! and implements the light [pipeline::Pipeline] trait.
mod expand;
pub mod pipeline;

pub use expand::{Expand, ExpandSummary};
pub use pipeline::Pipeline;
