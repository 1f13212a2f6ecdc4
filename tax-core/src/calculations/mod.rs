//! Tax estimation for Brazilian client profiles.
//!
//! The rate tables live in [`rates`]; [`estimator`] applies them.

pub mod common;
pub mod estimator;
pub mod rates;

pub use estimator::{TaxEstimator, line_items, summarize};
