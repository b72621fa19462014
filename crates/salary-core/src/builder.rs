//! Salary record construction.
//!
//! [`build`] is the single entry point that turns one raw salary string into a
//! [`SalaryRecord`]. It never fails: every input yields a record whose
//! [`ParseStatus`](crate::models::ParseStatus) says what happened.

use rayon::prelude::*;

use crate::annualize::annualize;
use crate::extract::extract;
use crate::models::SalaryRecord;
use crate::normalize::normalize;

/// Values scrapers and spreadsheets emit in place of a missing salary.
const MISSING_SENTINELS: &[&str] = &["n/a", "na", "none", "null", "nan", "-", "--"];

/// Build a record from a listing's salary field.
pub fn build(raw: Option<&str>) -> SalaryRecord {
    let Some(raw) = raw else {
        return SalaryRecord::empty(None);
    };
    if is_missing(raw) {
        return SalaryRecord::empty(Some(raw.to_string()));
    }

    match extract(&normalize(raw)) {
        Ok(extraction) => {
            let annual = annualize(extraction.range, extraction.unit);
            SalaryRecord::parsed(
                raw.to_string(),
                extraction.unit,
                extraction.range,
                annual,
                extraction.corrections,
            )
        }
        Err(_) => SalaryRecord::unparseable(raw.to_string()),
    }
}

/// Build records for many salary fields in parallel.
///
/// Output order matches input order.
pub fn build_batch<S>(raws: &[Option<S>]) -> Vec<SalaryRecord>
where
    S: AsRef<str> + Sync,
{
    raws.par_iter()
        .map(|raw| build(raw.as_ref().map(AsRef::as_ref)))
        .collect()
}

fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty()
        || MISSING_SENTINELS
            .iter()
            .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}
