use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SalaryError;

// ── PayPeriodUnit ─────────────────────────────────────────────────────────────

/// Hours in a standard US full-time work-year (40h × 52w).
pub const HOURS_PER_YEAR: f64 = 2080.0;
/// Working days in a standard US full-time work-year (5d × 52w).
pub const DAYS_PER_YEAR: f64 = 260.0;
/// Weeks per year.
pub const WEEKS_PER_YEAR: f64 = 52.0;
/// Months per year.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// The time basis over which a wage figure is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPeriodUnit {
    Hour,
    Day,
    Week,
    Month,
    Year,
    /// No unit could be determined. Only appears on records that failed to
    /// parse; annualizes like [`PayPeriodUnit::Year`].
    Unknown,
}

impl PayPeriodUnit {
    /// Every unit that carries a real multiplier, in detection precedence order.
    pub const KNOWN: [PayPeriodUnit; 5] = [
        PayPeriodUnit::Hour,
        PayPeriodUnit::Day,
        PayPeriodUnit::Week,
        PayPeriodUnit::Month,
        PayPeriodUnit::Year,
    ];

    /// Factor converting one unit of pay into its annual equivalent.
    pub const fn multiplier(self) -> f64 {
        match self {
            PayPeriodUnit::Hour => HOURS_PER_YEAR,
            PayPeriodUnit::Day => DAYS_PER_YEAR,
            PayPeriodUnit::Week => WEEKS_PER_YEAR,
            PayPeriodUnit::Month => MONTHS_PER_YEAR,
            PayPeriodUnit::Year | PayPeriodUnit::Unknown => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PayPeriodUnit::Hour => "hour",
            PayPeriodUnit::Day => "day",
            PayPeriodUnit::Week => "week",
            PayPeriodUnit::Month => "month",
            PayPeriodUnit::Year => "year",
            PayPeriodUnit::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PayPeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayPeriodUnit {
    type Err = SalaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(PayPeriodUnit::Hour),
            "day" => Ok(PayPeriodUnit::Day),
            "week" => Ok(PayPeriodUnit::Week),
            "month" => Ok(PayPeriodUnit::Month),
            "year" => Ok(PayPeriodUnit::Year),
            "unknown" => Ok(PayPeriodUnit::Unknown),
            other => Err(SalaryError::Config(format!("unknown pay period: {other}"))),
        }
    }
}

// ── ParsedRange ───────────────────────────────────────────────────────────────

/// A salary range with `min <= max`.
///
/// A single quoted figure is represented with `min == max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParsedRange {
    min: f64,
    max: f64,
}

impl ParsedRange {
    /// Build a range from two bounds in any order.
    ///
    /// Returns the range and whether the bounds had to be swapped.
    pub fn ordered(a: f64, b: f64) -> (Self, bool) {
        if a > b {
            (Self { min: b, max: a }, true)
        } else {
            (Self { min: a, max: b }, false)
        }
    }

    /// A range collapsed onto one value.
    pub fn single(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Midpoint of the range.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn is_single(&self) -> bool {
        self.min == self.max
    }

    /// Apply a monotonic non-decreasing transform to both bounds.
    pub(crate) fn map(self, f: impl Fn(f64) -> f64) -> Self {
        let (range, _) = Self::ordered(f(self.min), f(self.max));
        range
    }
}

// ── ParseStatus / Correction ──────────────────────────────────────────────────

/// Outcome of attempting to extract a salary from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStatus {
    Ok,
    /// Text was present but carried no usable number.
    Unparseable,
    /// No salary text was provided.
    Empty,
}

impl ParseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseStatus::Ok => "ok",
            ParseStatus::Unparseable => "unparseable",
            ParseStatus::Empty => "empty",
        }
    }
}

impl fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A best-effort recovery applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correction {
    /// The upper bound was quoted first; bounds were swapped.
    SwappedBounds,
    /// No pay-period keyword was present; the figure was taken as annual.
    DefaultedUnit,
}

impl Correction {
    pub fn as_str(self) -> &'static str {
        match self {
            Correction::SwappedBounds => "swapped_bounds",
            Correction::DefaultedUnit => "defaulted_unit",
        }
    }
}

// ── SalaryRecord ──────────────────────────────────────────────────────────────

/// Structured salary for one listing.
///
/// Only [`crate::builder::build`] creates records; there are no setters, so a
/// re-parse always yields a fresh record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryRecord {
    source_text: Option<String>,
    unit: PayPeriodUnit,
    range_raw: Option<ParsedRange>,
    range_annual: Option<ParsedRange>,
    average_raw: Option<f64>,
    average_annual: Option<f64>,
    status: ParseStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    corrections: Vec<Correction>,
}

impl SalaryRecord {
    pub(crate) fn empty(source_text: Option<String>) -> Self {
        Self {
            source_text,
            unit: PayPeriodUnit::Unknown,
            range_raw: None,
            range_annual: None,
            average_raw: None,
            average_annual: None,
            status: ParseStatus::Empty,
            corrections: Vec::new(),
        }
    }

    pub(crate) fn unparseable(source_text: String) -> Self {
        Self {
            status: ParseStatus::Unparseable,
            ..Self::empty(Some(source_text))
        }
    }

    pub(crate) fn parsed(
        source_text: String,
        unit: PayPeriodUnit,
        range_raw: ParsedRange,
        range_annual: ParsedRange,
        corrections: Vec<Correction>,
    ) -> Self {
        Self {
            source_text: Some(source_text),
            unit,
            range_raw: Some(range_raw),
            range_annual: Some(range_annual),
            average_raw: Some(range_raw.midpoint()),
            average_annual: Some(range_annual.midpoint()),
            status: ParseStatus::Ok,
            corrections,
        }
    }

    /// The unmodified salary text, if any was supplied.
    pub fn source_text(&self) -> Option<&str> {
        self.source_text.as_deref()
    }

    pub fn unit(&self) -> PayPeriodUnit {
        self.unit
    }

    /// Range in the originally quoted unit.
    pub fn range_raw(&self) -> Option<ParsedRange> {
        self.range_raw
    }

    /// Range converted to annual pay.
    pub fn range_annual(&self) -> Option<ParsedRange> {
        self.range_annual
    }

    /// Midpoint in the originally quoted unit.
    pub fn average_raw(&self) -> Option<f64> {
        self.average_raw
    }

    /// Midpoint of the annualized range.
    pub fn average_annual(&self) -> Option<f64> {
        self.average_annual
    }

    pub fn status(&self) -> ParseStatus {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status == ParseStatus::Ok
    }

    pub fn corrections(&self) -> &[Correction] {
        &self.corrections
    }

    /// `true` when any best-effort recovery was applied.
    pub fn is_corrected(&self) -> bool {
        !self.corrections.is_empty()
    }
}

// ── AggregateStat ─────────────────────────────────────────────────────────────

/// Descriptive statistics of annualized average salary for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStat {
    pub group_key: String,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` for single-record groups.
    pub stdev: Option<f64>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
