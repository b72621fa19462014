//! Enrichment pipeline.
//!
//! Attaches a parsed [`SalaryRecord`] to every listing and runs the full
//! load → enrich → aggregate pass behind the `stats` command.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use salary_core::builder::build_batch;
use salary_core::dataset::DatasetFilter;
use salary_core::error::{Result, SalaryError};
use salary_core::models::{ParseStatus, SalaryRecord};
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregator::{Aggregation, SalaryAggregator, SalarySummary};
use crate::listing::Listing;
use crate::reader::load_listings;

// ── EnrichedListing ───────────────────────────────────────────────────────────

/// A listing with its salary parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub salary_parsed: SalaryRecord,
}

// ── GroupKey ──────────────────────────────────────────────────────────────────

/// Field of an enriched listing that statistics can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    State,
    Month,
    Title,
    Unit,
}

impl GroupKey {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupKey::State => "state",
            GroupKey::Month => "month",
            GroupKey::Title => "title",
            GroupKey::Unit => "unit",
        }
    }

    /// Column heading used by reports.
    pub fn label(self) -> &'static str {
        match self {
            GroupKey::State => "State",
            GroupKey::Month => "Month",
            GroupKey::Title => "Job Title",
            GroupKey::Unit => "Pay Period",
        }
    }

    pub fn key_for(self, item: &EnrichedListing) -> String {
        match self {
            GroupKey::State => item.listing.state_key(),
            GroupKey::Month => item.listing.month_key(),
            GroupKey::Title => item.listing.title_key(),
            GroupKey::Unit => item.salary_parsed.unit().to_string(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupKey {
    type Err = SalaryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "state" => Ok(GroupKey::State),
            "month" => Ok(GroupKey::Month),
            "title" => Ok(GroupKey::Title),
            "unit" => Ok(GroupKey::Unit),
            other => Err(SalaryError::UnknownGroupKey(other.to_string())),
        }
    }
}

// ── SalaryReport ──────────────────────────────────────────────────────────────

/// Output of [`analyze`].
#[derive(Debug, Clone, Serialize)]
pub struct SalaryReport {
    /// RFC 3339 timestamp when this report was generated.
    pub generated_at: String,
    pub group_by: GroupKey,
    pub aggregation: Aggregation,
    pub summary: Option<SalarySummary>,
    pub files_loaded: usize,
    pub listings_loaded: usize,
    pub lines_skipped: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse the salary of every listing.
pub fn enrich(listings: Vec<Listing>) -> Vec<EnrichedListing> {
    let raws: Vec<Option<&str>> = listings.iter().map(|l| l.salary.as_deref()).collect();
    let records = build_batch(&raws);

    let enriched: Vec<EnrichedListing> = listings
        .into_iter()
        .zip(records)
        .map(|(listing, salary_parsed)| EnrichedListing {
            listing,
            salary_parsed,
        })
        .collect();

    for item in enriched
        .iter()
        .filter(|e| e.salary_parsed.status() == ParseStatus::Unparseable)
    {
        debug!(
            "Unparseable salary {:?} ({})",
            item.salary_parsed.source_text().unwrap_or_default(),
            item.listing.title_key()
        );
    }

    enriched
}

/// Load the listings selected by `filter`, parse their salaries and aggregate
/// by `group_by`.
pub fn analyze(data_dir: &Path, filter: &DatasetFilter, group_by: GroupKey) -> Result<SalaryReport> {
    let loaded = load_listings(data_dir, filter)?;
    let listings_loaded = loaded.listings.len();
    let enriched = enrich(loaded.listings);

    let aggregation = SalaryAggregator::aggregate_by(
        &enriched,
        |e| &e.salary_parsed,
        |e| group_by.key_for(e),
    );
    let records: Vec<SalaryRecord> = enriched.into_iter().map(|e| e.salary_parsed).collect();
    let summary = SalaryAggregator::summarize(&records);

    let counts = aggregation.counts();
    info!(
        "Parsed {} salaries: {} ok, {} unparseable, {} empty",
        counts.total(),
        counts.ok,
        counts.unparseable,
        counts.empty
    );

    Ok(SalaryReport {
        generated_at: Utc::now().to_rfc3339(),
        group_by,
        aggregation,
        summary,
        files_loaded: loaded.files_loaded,
        listings_loaded,
        lines_skipped: loaded.lines_skipped,
    })
}

/// Write enriched listings as JSON lines.
pub fn write_enriched<W: Write>(items: &[EnrichedListing], mut out: W) -> Result<()> {
    for item in items {
        serde_json::to_writer(&mut out, item)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Write enriched listings to `path` via a temporary file and rename.
pub fn write_enriched_file(items: &[EnrichedListing], path: &Path) -> Result<()> {
    let tmp = path.with_extension("jsonl.tmp");
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(&tmp)?;
        write_enriched(items, std::io::BufWriter::new(file)).map_err(std::io::Error::other)?;
        std::fs::rename(&tmp, path)
    };
    write().map_err(|source| SalaryError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use salary_core::dataset::DateFilter;
    use tempfile::TempDir;

    fn listing(state: &str, salary: Option<&str>) -> Listing {
        Listing {
            job_title: Some("Nurse".to_string()),
            state: Some(state.to_string()),
            salary: salary.map(str::to_string),
            date_added: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        }
    }

    // ── GroupKey ─────────────────────────────────────────────────────────────

    #[test]
    fn test_group_key_parsing() {
        assert_eq!("State".parse::<GroupKey>().unwrap(), GroupKey::State);
        assert_eq!(" unit ".parse::<GroupKey>().unwrap(), GroupKey::Unit);
        let err = "company".parse::<GroupKey>().unwrap_err();
        assert!(matches!(err, SalaryError::UnknownGroupKey(ref k) if k == "company"));
    }

    #[test]
    fn test_group_key_for_listing() {
        let item = enrich(vec![listing("Ohio", Some("$25/hr"))]).remove(0);
        assert_eq!(GroupKey::State.key_for(&item), "Ohio");
        assert_eq!(GroupKey::Month.key_for(&item), "2024-05");
        assert_eq!(GroupKey::Title.key_for(&item), "Nurse");
        assert_eq!(GroupKey::Unit.key_for(&item), "hour");
    }

    // ── enrich ───────────────────────────────────────────────────────────────

    #[test]
    fn test_enrich_preserves_order_and_status() {
        let enriched = enrich(vec![
            listing("Ohio", Some("50K")),
            listing("Texas", None),
            listing("Utah", Some("competitive")),
        ]);
        let statuses: Vec<ParseStatus> =
            enriched.iter().map(|e| e.salary_parsed.status()).collect();
        assert_eq!(
            statuses,
            vec![ParseStatus::Ok, ParseStatus::Empty, ParseStatus::Unparseable]
        );
        assert_eq!(enriched[1].listing.state.as_deref(), Some("Texas"));
    }

    #[test]
    fn test_enriched_listing_serializes_flat() {
        let item = enrich(vec![listing("Ohio", Some("50K"))]).remove(0);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["state"], "Ohio");
        assert_eq!(value["salary"], "50K");
        assert_eq!(value["salary_parsed"]["status"], "ok");
    }

    // ── analyze ──────────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_groups_by_state() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("Ohio_Nurse_jobs_2024-05-01.jsonl"),
            "{\"salary\": \"60K\"}\n{\"salary\": \"80K\"}\n{\"salary\": \"DOE\"}\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("Texas_Nurse_jobs_2024-05-02.jsonl"),
            "{\"salary\": \"$30/hr\"}\n{}\n",
        )
        .unwrap();

        let filter = DatasetFilter::new("Nurse", None, true, DateFilter::default()).unwrap();
        let report = analyze(tmp.path(), &filter, GroupKey::State).unwrap();

        assert_eq!(report.files_loaded, 2);
        assert_eq!(report.listings_loaded, 5);
        assert_eq!(report.aggregation.len(), 2);
        let ohio = report.aggregation.get("Ohio").unwrap();
        assert_eq!(ohio.count, 2);
        assert!((ohio.mean - 70_000.0).abs() < 1e-9);
        assert!((report.aggregation.get("Texas").unwrap().mean - 62_400.0).abs() < 1e-9);

        let counts = report.aggregation.counts();
        assert_eq!((counts.ok, counts.unparseable, counts.empty), (3, 1, 1));
        assert_eq!(report.summary.unwrap().count, 3);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["aggregation"]["parse_failure_rate"], 0.25);
    }

    #[test]
    fn test_analyze_missing_dir_errors() {
        let tmp = TempDir::new().unwrap();
        let filter = DatasetFilter::new("Nurse", None, true, DateFilter::default()).unwrap();
        let err = analyze(&tmp.path().join("missing"), &filter, GroupKey::Unit).unwrap_err();
        assert!(matches!(err, SalaryError::DataPathNotFound(_)));
    }

    // ── write_enriched ───────────────────────────────────────────────────────

    #[test]
    fn test_write_enriched_one_line_per_listing() {
        let items = enrich(vec![listing("Ohio", Some("50K")), listing("Utah", None)]);
        let mut buf = Vec::new();
        write_enriched(&items, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| serde_json::from_str::<serde_json::Value>(l).is_ok()));
    }

    #[test]
    fn test_write_enriched_file_creates_parent_and_no_tmp() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out").join("enriched.jsonl");
        let items = enrich(vec![listing("Ohio", Some("50K"))]);
        write_enriched_file(&items, &path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("jsonl.tmp").exists());
    }
}
