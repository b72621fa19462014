//! Range and pay-period extraction from normalised salary text.
//!
//! Extraction runs an explicit, ordered list of matchers over the text; the
//! first one that produces a result wins:
//!
//! 1. [`range_with_unit`]:    `"30-37.50/hr"`
//! 2. [`range_without_unit`]: `"130k-160k"` (taken as annual)
//! 3. [`single_value`]:       `"90k a year"`, `"45/hr"`, `"75000"`

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::models::{Correction, ParsedRange, PayPeriodUnit};
use crate::normalize::NormalizedText;

// ── Patterns ──────────────────────────────────────────────────────────────────

/// A number with an optional decimal part and optional `k` (thousands) suffix.
const NUMBER: &str = r"(\d+(?:\.\d+)?|\.\d+)\s?(k\b)?";

static SINGLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(NUMBER).expect("regex is valid"));

static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{NUMBER}\s*(?:-|–|—|\bto\b)\s*{NUMBER}")).expect("regex is valid")
});

/// Unit keywords in precedence order; the first unit whose pattern occurs
/// anywhere in the text is used.
static UNIT_PATTERNS: LazyLock<Vec<(PayPeriodUnit, Regex)>> = LazyLock::new(|| {
    [
        (PayPeriodUnit::Hour, r"\b(?:hours?|hourly|hrs?)\b|/h\b"),
        (PayPeriodUnit::Day, r"\b(?:days?|daily)\b"),
        (PayPeriodUnit::Week, r"\b(?:weeks?|weekly|wks?)\b"),
        (PayPeriodUnit::Month, r"\b(?:months?|monthly|mos?)\b"),
        (
            PayPeriodUnit::Year,
            r"\b(?:years?|yearly|yrs?|annual|annually|annum)\b",
        ),
    ]
    .into_iter()
    .map(|(unit, pattern)| (unit, Regex::new(pattern).expect("regex is valid")))
    .collect()
});

// ── Public types ──────────────────────────────────────────────────────────────

/// Text carried no salary figure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no salary figure found in {0:?}")]
pub struct Unparseable(pub String);

/// A successful extraction, still in the quoted pay period.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub range: ParsedRange,
    pub unit: PayPeriodUnit,
    pub corrections: Vec<Correction>,
}

/// Pre-computed view of the text shared by every matcher.
#[derive(Debug)]
pub struct Scan<'a> {
    /// Unit keyword found anywhere in the text, if any.
    pub unit: Option<PayPeriodUnit>,
    /// Text searched for numbers (parenthetical asides removed).
    pub body: Cow<'a, str>,
}

impl<'a> Scan<'a> {
    pub fn new(text: &'a NormalizedText) -> Self {
        Self {
            unit: detect_unit(text.as_str()),
            body: text.without_asides(),
        }
    }
}

/// A single extraction strategy.
pub type Matcher = fn(&Scan<'_>) -> Option<Extraction>;

/// Every strategy, in the order they are tried.
pub const MATCHERS: [(&str, Matcher); 3] = [
    ("range_with_unit", range_with_unit),
    ("range_without_unit", range_without_unit),
    ("single_value", single_value),
];

// ── Public functions ──────────────────────────────────────────────────────────

/// Extract a salary range and pay period from normalised text.
pub fn extract(text: &NormalizedText) -> Result<Extraction, Unparseable> {
    let scan = Scan::new(text);
    MATCHERS
        .iter()
        .find_map(|(_, matcher)| matcher(&scan))
        .ok_or_else(|| Unparseable(text.as_str().to_string()))
}

/// Find the first pay-period keyword, checked in [`PayPeriodUnit::KNOWN`] order.
pub fn detect_unit(text: &str) -> Option<PayPeriodUnit> {
    UNIT_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(unit, _)| *unit)
}

// ── Matchers ──────────────────────────────────────────────────────────────────

/// Two numbers around a range delimiter, with an explicit unit keyword.
pub fn range_with_unit(scan: &Scan<'_>) -> Option<Extraction> {
    let unit = scan.unit?;
    let (range, swapped) = find_range(&scan.body)?;
    Some(Extraction {
        range,
        unit,
        corrections: swapped.then_some(Correction::SwappedBounds).into_iter().collect(),
    })
}

/// Two numbers around a range delimiter and no unit keyword: taken as annual.
pub fn range_without_unit(scan: &Scan<'_>) -> Option<Extraction> {
    if scan.unit.is_some() {
        return None;
    }
    let (range, swapped) = find_range(&scan.body)?;
    let mut corrections = vec![Correction::DefaultedUnit];
    if swapped {
        corrections.insert(0, Correction::SwappedBounds);
    }
    Some(Extraction {
        range,
        unit: PayPeriodUnit::Year,
        corrections,
    })
}

/// The first number in the text, used as both bounds.
pub fn single_value(scan: &Scan<'_>) -> Option<Extraction> {
    let caps = SINGLE.captures(&scan.body)?;
    let value = number_from(&caps, 1, 2)?;
    let (unit, corrections) = match scan.unit {
        Some(unit) => (unit, Vec::new()),
        None => (PayPeriodUnit::Year, vec![Correction::DefaultedUnit]),
    };
    Some(Extraction {
        range: ParsedRange::single(value),
        unit,
        corrections,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn find_range(body: &str) -> Option<(ParsedRange, bool)> {
    let caps = RANGE.captures(body)?;
    let low = number_from(&caps, 1, 2)?;
    let high = number_from(&caps, 3, 4)?;
    Some(ParsedRange::ordered(low, high))
}

/// Read the number in capture group `digits`, scaled by 1000 when the
/// `suffix` group matched.
fn number_from(caps: &Captures<'_>, digits: usize, suffix: usize) -> Option<f64> {
    let value: f64 = caps.get(digits)?.as_str().parse().ok()?;
    if caps.get(suffix).is_some() {
        Some(value * 1000.0)
    } else {
        Some(value)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
