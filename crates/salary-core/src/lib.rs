//! Salary parsing and statistics core.
//!
//! Normalises free-text salary expressions, extracts ranges and pay periods,
//! annualizes them on a 2080-hour work-year and provides the statistics
//! helpers, formatting and configuration shared by the other crates. Nothing
//! in the parsing path performs I/O.

pub mod annualize;
pub mod builder;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod formatting;
pub mod models;
pub mod normalize;
pub mod settings;
pub mod stats;

pub use annualize::annualize;
pub use builder::{build, build_batch};
pub use error::{Result, SalaryError};
pub use extract::extract;
pub use models::{AggregateStat, Correction, ParseStatus, ParsedRange, PayPeriodUnit, SalaryRecord};
pub use normalize::normalize;
