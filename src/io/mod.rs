//! Table loading and artifact export.

pub mod export;
pub mod load;
