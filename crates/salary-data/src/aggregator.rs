//! Salary aggregation over caller-chosen groups.
//!
//! Only successfully parsed records contribute to statistics. Every record is
//! still counted into [`ParseCounts`] so the failure rate can be reported next
//! to the numbers.

use std::collections::HashMap;

use salary_core::models::{AggregateStat, ParseStatus, SalaryRecord};
use salary_core::stats::{self, describe};
use serde::Serialize;

// ── ParseCounts ───────────────────────────────────────────────────────────────

/// How many records of a batch ended in each [`ParseStatus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseCounts {
    pub ok: usize,
    pub unparseable: usize,
    pub empty: usize,
}

impl ParseCounts {
    pub fn add(&mut self, status: ParseStatus) {
        match status {
            ParseStatus::Ok => self.ok += 1,
            ParseStatus::Unparseable => self.unparseable += 1,
            ParseStatus::Empty => self.empty += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.ok + self.unparseable + self.empty
    }

    /// Share of salary texts that could not be parsed.
    ///
    /// Empty salaries are not failures. `None` when no salary text was present.
    pub fn parse_failure_rate(&self) -> Option<f64> {
        let attempted = self.ok + self.unparseable;
        if attempted == 0 {
            None
        } else {
            Some(self.unparseable as f64 / attempted as f64)
        }
    }
}

// ── Aggregation ───────────────────────────────────────────────────────────────

/// Per-group statistics plus parse counts for the whole batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregation {
    groups: Vec<AggregateStat>,
    counts: ParseCounts,
    /// Copy of [`ParseCounts::parse_failure_rate`] so serialized reports carry it.
    parse_failure_rate: Option<f64>,
}

impl Aggregation {
    /// Groups in first-occurrence order of their keys.
    pub fn groups(&self) -> &[AggregateStat] {
        &self.groups
    }

    pub fn get(&self, group_key: &str) -> Option<&AggregateStat> {
        self.groups.iter().find(|g| g.group_key == group_key)
    }

    pub fn counts(&self) -> ParseCounts {
        self.counts
    }

    pub fn parse_failure_rate(&self) -> Option<f64> {
        self.parse_failure_rate
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

// ── SalarySummary ─────────────────────────────────────────────────────────────

/// Mean and median of one annualized figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Center {
    pub mean: f64,
    pub median: f64,
}

impl Center {
    fn of(mut values: Vec<f64>) -> Option<Self> {
        stats::sort_values(&mut values);
        Some(Self {
            mean: stats::mean(&values)?,
            median: stats::median(&values)?,
        })
    }
}

/// Overall picture of a batch: where the bottoms, tops and midpoints of the
/// annualized ranges sit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SalarySummary {
    pub count: usize,
    pub min_annual: Center,
    pub max_annual: Center,
    pub average_annual: Center,
}

// ── SalaryAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that groups salary records and describes each group.
pub struct SalaryAggregator;

impl SalaryAggregator {
    /// Group `records` by `key_fn` and describe each group's annualized average.
    ///
    /// `key_fn` is only consulted for parsed records.
    pub fn aggregate<F>(records: &[SalaryRecord], key_fn: F) -> Aggregation
    where
        F: Fn(&SalaryRecord) -> String,
    {
        Self::aggregate_by(records, |r| r, |r| key_fn(r))
    }

    /// Like [`SalaryAggregator::aggregate`], with a key function that can fail.
    ///
    /// The first key error is returned unchanged.
    pub fn try_aggregate<F, E>(records: &[SalaryRecord], key_fn: F) -> Result<Aggregation, E>
    where
        F: Fn(&SalaryRecord) -> Result<String, E>,
    {
        Self::try_aggregate_by(records, |r| r, |r| key_fn(r))
    }

    /// Group caller-owned items that each carry a salary record.
    pub fn aggregate_by<T, R, F>(items: &[T], record_of: R, key_fn: F) -> Aggregation
    where
        R: Fn(&T) -> &SalaryRecord,
        F: Fn(&T) -> String,
    {
        let infallible: Result<Aggregation, std::convert::Infallible> =
            Self::try_aggregate_by(items, record_of, |item| Ok(key_fn(item)));
        match infallible {
            Ok(aggregation) => aggregation,
            Err(never) => match never {},
        }
    }

    /// Mean and median of annual min, max and average over parsed records.
    ///
    /// `count` is the number of parsed records the centers were computed
    /// from, not the number of input rows; unparseable and empty salaries are
    /// reported through [`ParseCounts`] instead. Returns `None` when nothing
    /// parsed.
    pub fn summarize(records: &[SalaryRecord]) -> Option<SalarySummary> {
        let mut mins = Vec::new();
        let mut maxes = Vec::new();
        let mut averages = Vec::new();
        for record in records.iter().filter(|r| r.is_ok()) {
            if let (Some(range), Some(avg)) = (record.range_annual(), record.average_annual()) {
                mins.push(range.min());
                maxes.push(range.max());
                averages.push(avg);
            }
        }

        Some(SalarySummary {
            count: averages.len(),
            min_annual: Center::of(mins)?,
            max_annual: Center::of(maxes)?,
            average_annual: Center::of(averages)?,
        })
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn try_aggregate_by<T, R, F, E>(
        items: &[T],
        record_of: R,
        key_fn: F,
    ) -> Result<Aggregation, E>
    where
        R: Fn(&T) -> &SalaryRecord,
        F: Fn(&T) -> Result<String, E>,
    {
        let mut counts = ParseCounts::default();
        let mut order: Vec<String> = Vec::new();
        let mut values: HashMap<String, Vec<f64>> = HashMap::new();

        for item in items {
            let record = record_of(item);
            counts.add(record.status());
            let Some(avg) = record.average_annual().filter(|_| record.is_ok()) else {
                continue;
            };

            let key = key_fn(item)?;
            match values.get_mut(&key) {
                Some(bucket) => bucket.push(avg),
                None => {
                    order.push(key.clone());
                    values.insert(key, vec![avg]);
                }
            }
        }

        let groups = order
            .into_iter()
            .filter_map(|key| {
                let sample = values.remove(&key)?;
                let d = describe(sample)?;
                Some(AggregateStat {
                    group_key: key,
                    count: d.count,
                    min: d.min,
                    max: d.max,
                    mean: d.mean,
                    median: d.median,
                    stdev: d.stdev,
                })
            })
            .collect();

        Ok(Aggregation {
            groups,
            counts,
            parse_failure_rate: counts.parse_failure_rate(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use salary_core::build;

    fn records(texts: &[Option<&str>]) -> Vec<SalaryRecord> {
        texts.iter().map(|t| build(*t)).collect()
    }

    fn by_unit(r: &SalaryRecord) -> String {
        r.unit().to_string()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ── aggregate ────────────────────────────────────────────────────────────

    #[test]
    fn test_aggregate_empty_input() {
        let agg = SalaryAggregator::aggregate(&[], by_unit);
        assert!(agg.is_empty());
        assert_eq!(agg.counts().total(), 0);
        assert_eq!(agg.counts().parse_failure_rate(), None);
    }

    #[test]
    fn test_aggregate_groups_in_first_occurrence_order() {
        let recs = records(&[
            Some("$30/hr"),
            Some("100K a year"),
            Some("$40/hr"),
            Some("120K a year"),
        ]);
        let agg = SalaryAggregator::aggregate(&recs, by_unit);
        let keys: Vec<&str> = agg.groups().iter().map(|g| g.group_key.as_str()).collect();
        assert_eq!(keys, vec!["hour", "year"]);

        let hour = agg.get("hour").unwrap();
        assert_eq!(hour.count, 2);
        assert!(approx(hour.min, 62_400.0));
        assert!(approx(hour.max, 83_200.0));
        assert!(approx(hour.mean, 72_800.0));
        assert!(approx(hour.median, 72_800.0));
    }

    #[test]
    fn test_aggregate_statistics_invariant_under_reordering() {
        let forward = records(&[Some("50K"), Some("70K"), Some("65K"), Some("90K")]);
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = SalaryAggregator::aggregate(&forward, |_| "all".to_string());
        let b = SalaryAggregator::aggregate(&reversed, |_| "all".to_string());
        assert_eq!(a.groups(), b.groups());
        assert!(approx(a.groups()[0].median, 67_500.0));
    }

    #[test]
    fn test_aggregate_single_record_has_no_stdev() {
        let agg = SalaryAggregator::aggregate(&records(&[Some("80K")]), by_unit);
        let g = &agg.groups()[0];
        assert_eq!(g.count, 1);
        assert_eq!(g.stdev, None);
        assert!(approx(g.min, g.max));
    }

    #[test]
    fn test_aggregate_counts_failures_but_skips_them() {
        let recs = records(&[
            Some("80K"),
            Some("competitive"),
            Some("DOE"),
            None,
            Some("N/A"),
            Some("90K"),
        ]);
        let agg = SalaryAggregator::aggregate(&recs, by_unit);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.groups()[0].count, 2);

        let counts = agg.counts();
        assert_eq!(counts.ok, 2);
        assert_eq!(counts.unparseable, 2);
        assert_eq!(counts.empty, 2);
        assert!(approx(counts.parse_failure_rate().unwrap(), 0.5));
    }

    #[test]
    fn test_aggregation_json_carries_failure_rate() {
        let agg = SalaryAggregator::aggregate(&records(&[Some("50K"), Some("DOE")]), by_unit);
        assert_eq!(agg.parse_failure_rate(), Some(0.5));

        let value = serde_json::to_value(&agg).unwrap();
        assert_eq!(value["parse_failure_rate"], 0.5);
        assert_eq!(value["counts"]["unparseable"], 1);

        let empty = serde_json::to_value(SalaryAggregator::aggregate(&[], by_unit)).unwrap();
        assert!(empty["parse_failure_rate"].is_null());
    }

    #[test]
    fn test_aggregate_only_failures_yields_no_groups() {
        let agg = SalaryAggregator::aggregate(&records(&[Some("negotiable")]), by_unit);
        assert!(agg.is_empty());
        assert_eq!(agg.counts().parse_failure_rate(), Some(1.0));
    }

    // ── try_aggregate ────────────────────────────────────────────────────────

    #[test]
    fn test_try_aggregate_propagates_key_error() {
        let recs = records(&[Some("50K"), Some("$20/hr")]);
        let result = SalaryAggregator::try_aggregate(&recs, |r| {
            if r.unit() == salary_core::PayPeriodUnit::Hour {
                Err("hourly not allowed")
            } else {
                Ok("ok".to_string())
            }
        });
        assert_eq!(result.unwrap_err(), "hourly not allowed");
    }

    #[test]
    fn test_try_aggregate_key_fn_not_called_for_failures() {
        let recs = records(&[Some("not disclosed"), None]);
        let result: Result<Aggregation, &str> =
            SalaryAggregator::try_aggregate(&recs, |_| Err("should not be called"));
        assert!(result.unwrap().is_empty());
    }

    // ── aggregate_by ─────────────────────────────────────────────────────────

    #[test]
    fn test_aggregate_by_uses_item_keys() {
        let items = vec![
            ("Texas", build(Some("60K"))),
            ("Ohio", build(Some("50K"))),
            ("Texas", build(Some("80K"))),
        ];
        let agg = SalaryAggregator::aggregate_by(&items, |(_, r)| r, |(s, _)| s.to_string());
        assert_eq!(agg.len(), 2);
        assert!(approx(agg.get("Texas").unwrap().mean, 70_000.0));
        assert_eq!(agg.get("Ohio").unwrap().count, 1);
    }

    // ── summarize ────────────────────────────────────────────────────────────

    #[test]
    fn test_summarize_centers() {
        let recs = records(&[Some("100K-120K"), Some("80K-100K"), Some("N/A")]);
        let summary = SalaryAggregator::summarize(&recs).unwrap();
        assert_eq!(summary.count, 2);
        assert!(approx(summary.min_annual.mean, 90_000.0));
        assert!(approx(summary.max_annual.median, 110_000.0));
        assert!(approx(summary.average_annual.mean, 100_000.0));
    }

    #[test]
    fn test_summarize_nothing_parsed() {
        assert!(SalaryAggregator::summarize(&records(&[None, Some("TBD")])).is_none());
    }
}
