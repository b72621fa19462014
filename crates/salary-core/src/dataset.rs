//! Dataset selection: which listing files a report should read.
//!
//! Listing files are named `{State}_{Job_Title}_jobs_{YYYY-MM-DD}.jsonl`,
//! with spaces replaced by underscores.

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, SalaryError};

/// Label used for combined multi-state files; never read as a single state.
pub const ALL_STATES_LABEL: &str = "ALL_STATES";

/// Replace spaces with underscores, as used in listing file names.
pub fn file_label(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Turn a file-name label back into a display name (`New_Jersey` → `New Jersey`).
pub fn display_label(label: &str) -> String {
    label.replace('_', " ")
}

// ── StateScope ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateScope {
    State(String),
    All,
}

// ── DateFilter ────────────────────────────────────────────────────────────────

/// Optional year / month / day restriction on the file date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFilter {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
}

impl DateFilter {
    /// Validate a year / month / day combination.
    ///
    /// Month or day requires a year, and day requires a month.
    pub fn new(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Result<Self> {
        if (month.is_some() || day.is_some()) && year.is_none() {
            return Err(SalaryError::InvalidFilter(
                "year is required when filtering by month or day".to_string(),
            ));
        }
        if day.is_some() && month.is_none() {
            return Err(SalaryError::InvalidFilter(
                "month is required when filtering by day".to_string(),
            ));
        }
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(SalaryError::InvalidFilter(format!("month out of range: {m}")));
            }
        }
        if let Some(d) = day {
            if !(1..=31).contains(&d) {
                return Err(SalaryError::InvalidFilter(format!("day out of range: {d}")));
            }
        }
        Ok(Self { year, month, day })
    }

    /// Parse a full `YYYY-MM-DD` date.
    pub fn from_date_str(date: &str) -> Result<Self> {
        let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| SalaryError::InvalidDate(date.to_string()))?;
        Ok(Self::exact(parsed))
    }

    pub fn exact(date: NaiveDate) -> Self {
        Self {
            year: Some(date.year()),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.year.is_none()
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        self.year.map_or(true, |y| y == date.year())
            && self.month.map_or(true, |m| m == date.month())
            && self.day.map_or(true, |d| d == date.day())
    }
}

// ── DatasetFilter ─────────────────────────────────────────────────────────────

/// A validated selection of listing files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFilter {
    job_title: String,
    scope: StateScope,
    dates: DateFilter,
}

impl DatasetFilter {
    /// Exactly one of `state` / `all_states` must be given.
    pub fn new(
        job_title: &str,
        state: Option<&str>,
        all_states: bool,
        dates: DateFilter,
    ) -> Result<Self> {
        if job_title.trim().is_empty() {
            return Err(SalaryError::InvalidFilter("job title is required".to_string()));
        }
        let scope = match (state.map(str::trim), all_states) {
            (Some(s), false) if !s.is_empty() => StateScope::State(s.to_string()),
            (None, true) => StateScope::All,
            _ => {
                return Err(SalaryError::InvalidFilter(
                    "specify either a state or all states, but not both".to_string(),
                ))
            }
        };
        Ok(Self {
            job_title: job_title.trim().to_string(),
            scope,
            dates,
        })
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn scope(&self) -> &StateScope {
        &self.scope
    }

    pub fn dates(&self) -> DateFilter {
        self.dates
    }

    /// Check a file's state label, title label and date against the filter.
    pub fn matches(&self, state_label: &str, title_label: &str, date: NaiveDate) -> bool {
        let state_ok = match &self.scope {
            StateScope::State(state) => file_label(state).eq_ignore_ascii_case(state_label),
            StateScope::All => !state_label.eq_ignore_ascii_case(ALL_STATES_LABEL),
        };
        state_ok
            && file_label(&self.job_title).eq_ignore_ascii_case(title_label)
            && self.dates.matches(date)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
