//! Text views of salary records, group statistics and summaries.

use salary_core::formatting::{format_currency, format_number, format_range};
use salary_core::models::{AggregateStat, SalaryRecord};
use salary_data::aggregator::{ParseCounts, SalarySummary};

use crate::table::{Align, TextTable};

const MISSING: &str = "—";

/// Longest source text shown before it is cut with an ellipsis.
const SOURCE_WIDTH: usize = 40;

/// One row per group plus a parse-failure footer.
///
/// `group_label` heads the first column, e.g. `"State"`.
pub fn render_stats_table(groups: &[AggregateStat], counts: &ParseCounts, group_label: &str) -> String {
    let mut out = String::new();
    if groups.is_empty() {
        out.push_str("No parsed salaries to aggregate.\n");
    } else {
        let mut table = TextTable::new(&[
            (group_label, Align::Left),
            ("Count", Align::Right),
            ("Min", Align::Right),
            ("Max", Align::Right),
            ("Mean", Align::Right),
            ("Median", Align::Right),
            ("Stdev", Align::Right),
        ]);
        for g in groups {
            table.push_row(vec![
                g.group_key.clone(),
                format_number(g.count as f64, 0),
                format_currency(g.min),
                format_currency(g.max),
                format_currency(g.mean),
                format_currency(g.median),
                g.stdev.map_or_else(|| MISSING.to_string(), format_currency),
            ]);
        }
        let total: usize = groups.iter().map(|g| g.count).sum();
        table.set_footer(vec![
            format!("{} groups", groups.len()),
            format_number(total as f64, 0),
        ]);
        out.push_str(&table.render());
        out.push('\n');
    }
    out.push_str(&render_parse_counts(counts));
    out
}

/// `Parsed 3 of 5 salaries (1 unparseable, 1 empty) · failure rate 25.0%`
pub fn render_parse_counts(counts: &ParseCounts) -> String {
    let rate = counts
        .parse_failure_rate()
        .map_or_else(|| "n/a".to_string(), |r| format!("{:.1}%", r * 100.0));
    format!(
        "Parsed {} of {} salaries ({} unparseable, {} empty) · failure rate {}\n",
        counts.ok,
        counts.total(),
        counts.unparseable,
        counts.empty,
        rate
    )
}

/// One row per record: what was read and what it annualizes to.
pub fn render_records_table(records: &[SalaryRecord]) -> String {
    let mut table = TextTable::new(&[
        ("Source", Align::Left),
        ("Status", Align::Left),
        ("Unit", Align::Left),
        ("Raw", Align::Right),
        ("Annual", Align::Right),
        ("Average", Align::Right),
        ("Notes", Align::Left),
    ]);
    for record in records {
        let notes: Vec<&str> = record.corrections().iter().map(|c| c.as_str()).collect();
        table.push_row(vec![
            truncate(record.source_text().unwrap_or(MISSING), SOURCE_WIDTH),
            record.status().to_string(),
            if record.is_ok() {
                record.unit().to_string()
            } else {
                MISSING.to_string()
            },
            record
                .range_raw()
                .map_or_else(|| MISSING.to_string(), |r| format_range(&r)),
            record
                .range_annual()
                .map_or_else(|| MISSING.to_string(), |r| format_range(&r)),
            record
                .average_annual()
                .map_or_else(|| MISSING.to_string(), format_currency),
            notes.join(", "),
        ]);
    }
    let mut out = table.render();
    out.push('\n');
    out
}

/// Overall centers of the annualized ranges.
pub fn render_summary(summary: &SalarySummary) -> String {
    let mut table = TextTable::new(&[
        ("Annual", Align::Left),
        ("Mean", Align::Right),
        ("Median", Align::Right),
    ]);
    for (label, center) in [
        ("Minimum", summary.min_annual),
        ("Maximum", summary.max_annual),
        ("Average", summary.average_annual),
    ] {
        table.push_row(vec![
            label.to_string(),
            format_currency(center.mean),
            format_currency(center.median),
        ]);
    }
    format!(
        "Summary of {} parsed salaries\n{}\n",
        format_number(summary.count as f64, 0),
        table.render()
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
