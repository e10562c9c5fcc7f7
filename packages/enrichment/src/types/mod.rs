//! Data types for the enrichment pipeline.
//!
//! All entities here are created fresh per analysis request and dropped
//! with the response; persistence is an external collaborator's concern.

pub mod candidate;
pub mod category;
pub mod config;
pub mod footprint;
pub mod fragment;
pub mod report;
