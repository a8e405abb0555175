//! Data preparation for residential energy-demand modelling.
//!
//! Derives three datasets from spreadsheet/CSV sources: a postcode-scaled
//! hour-by-month usage profile, an hourly grid carbon-intensity table, and a
//! non-leap-year hourly demand series interpolated from the profile.

pub mod calendar;
pub mod config;
pub mod error;
pub mod interp;
pub mod io;
pub mod observability;
pub mod pipeline;
pub mod stages;
pub mod summary;
pub mod tables;

pub use error::{PrepError, Result};
