//! Provider extraction and cross-provider aggregation.

pub mod aggregate;
pub mod extract;

pub use aggregate::aggregate;
pub use extract::{extract_fragment, extract_items};
