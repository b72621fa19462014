//! Data layer for jobsearch.
//!
//! Discovers and reads listing files, attaches parsed salaries to each listing
//! and aggregates them into per-group statistics.

pub mod aggregator;
pub mod enrich;
pub mod listing;
pub mod reader;

pub use aggregator::{Aggregation, ParseCounts, SalaryAggregator, SalarySummary};
pub use enrich::{analyze, enrich, EnrichedListing, GroupKey, SalaryReport};
pub use listing::Listing;
pub use salary_core as core;
