//! Core trait abstractions for the enrichment pipeline.
//!
//! These traits define the seams applications implement to provide the
//! remote judgment capability and page fetching.

pub mod fetcher;
pub mod judge;
