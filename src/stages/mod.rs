//! The three pipeline stages. Each takes in-memory tables and returns a new one.

pub mod aggregate;
pub mod normalize;
pub mod synthesize;

pub use aggregate::aggregate_by_hour;
pub use normalize::{UsageSelection, normalize_for_postcode, normalize_profile};
pub use synthesize::synthesize_annual;
