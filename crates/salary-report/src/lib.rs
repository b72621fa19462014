//! Report rendering for jobsearch.
//!
//! Column-aligned text tables for salary records, per-group statistics and
//! summaries, plus pretty JSON for the same structures.

pub mod table;
pub mod table_view;

use serde::Serialize;

pub use table_view::{render_parse_counts, render_records_table, render_stats_table, render_summary};

/// Pretty-printed JSON for any report structure.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> salary_core::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_records() {
        let records = vec![salary_core::build(Some("$30-37.50/hr"))];
        let json = render_json(&records).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["unit"], "hour");
        assert_eq!(value[0]["average_annual"], 70_200.0);
    }

    #[test]
    fn test_render_json_aggregation_includes_failure_rate() {
        use salary_data::aggregator::SalaryAggregator;

        let records = vec![salary_core::build(Some("50K")), salary_core::build(Some("DOE"))];
        let agg = SalaryAggregator::aggregate(&records, |r| r.unit().to_string());
        let json = render_json(&agg).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["parse_failure_rate"], 0.5);
        assert_eq!(value["counts"]["ok"], 1);
    }
}
