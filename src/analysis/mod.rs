//! Analysis modules.
//!
//! Aggregation over record collections; everything here is pure.

pub mod aggregator;

pub use aggregator::*;
