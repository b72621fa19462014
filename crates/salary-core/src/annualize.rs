use crate::models::{ParsedRange, PayPeriodUnit};

/// Convert a range quoted per `unit` into its full-time annual equivalent.
///
/// Both bounds are multiplied by [`PayPeriodUnit::multiplier`] and rounded to
/// whole cents. [`PayPeriodUnit::Unknown`] is treated as annual.
pub fn annualize(range: ParsedRange, unit: PayPeriodUnit) -> ParsedRange {
    let factor = unit.multiplier();
    range.map(|value| round_cents(value * factor))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
