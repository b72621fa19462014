//! Listing file discovery and loading.
//!
//! Reads JSON-lines listing files named `{State}_{Job_Title}_jobs_{YYYY-MM-DD}.jsonl`
//! from the listings directory and converts them into [`Listing`] structs.
//!
//! Only JSON lines are read. Listing exports saved as
//! `{State}_{Job_Title}_jobs_{YYYY-MM-DD}.csv` are not picked up and must be
//! converted to `.jsonl` (one listing object per line) first.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use salary_core::dataset::{display_label, file_label, DatasetFilter};
use salary_core::error::{Result, SalaryError};
use tracing::{debug, warn};

use crate::listing::Listing;

static FILE_STEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<head>.+)_jobs_(?P<date>\d{4}-\d{2}-\d{2})$").expect("regex is valid")
});

// ── Public types ──────────────────────────────────────────────────────────────

/// A listing file whose name matched the dataset filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFile {
    pub path: PathBuf,
    /// State portion of the file name, e.g. `"New_Jersey"`.
    pub state_label: String,
    /// Collection date from the file name.
    pub date: NaiveDate,
}

impl ListingFile {
    /// Display name of the state encoded in the file name.
    pub fn state(&self) -> String {
        display_label(&self.state_label)
    }
}

/// Listings read from every matching file.
#[derive(Debug, Clone, Default)]
pub struct LoadedListings {
    pub listings: Vec<Listing>,
    pub files_loaded: usize,
    /// Lines that were not valid listing JSON.
    pub lines_skipped: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Split a listing file path into state label and date, provided its title
/// portion equals `title_label` (case-insensitive).
pub fn parse_listing_file(path: &Path, title_label: &str) -> Option<ListingFile> {
    if path.extension().map(|ext| ext != "jsonl").unwrap_or(true) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let caps = FILE_STEM.captures(stem)?;
    let head = caps.name("head")?.as_str();
    let date = NaiveDate::parse_from_str(caps.name("date")?.as_str(), "%Y-%m-%d").ok()?;

    let suffix = format!("_{}", title_label.to_ascii_lowercase());
    if !head.to_ascii_lowercase().ends_with(&suffix) {
        return None;
    }
    let state_label = &head[..head.len() - suffix.len()];
    if state_label.is_empty() {
        return None;
    }

    Some(ListingFile {
        path: path.to_path_buf(),
        state_label: state_label.to_string(),
        date,
    })
}

/// Find all listing files under `data_dir` that match `filter`, sorted by path.
pub fn find_listing_files(data_dir: &Path, filter: &DatasetFilter) -> Result<Vec<ListingFile>> {
    if !data_dir.is_dir() {
        return Err(SalaryError::DataPathNotFound(data_dir.to_path_buf()));
    }

    let title_label = file_label(filter.job_title());
    let mut files: Vec<ListingFile> = walkdir::WalkDir::new(data_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| parse_listing_file(entry.path(), &title_label))
        .filter(|file| filter.matches(&file.state_label, &title_label, file.date))
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Load every listing from the files matching `filter`.
///
/// Unreadable files and malformed lines are logged and skipped so one bad
/// file does not abort the batch.
pub fn load_listings(data_dir: &Path, filter: &DatasetFilter) -> Result<LoadedListings> {
    let files = find_listing_files(data_dir, filter)?;
    if files.is_empty() {
        warn!("No listing files matched in {}", data_dir.display());
    }

    let mut loaded = LoadedListings::default();
    for file in &files {
        match read_listing_file(file) {
            Ok((listings, skipped)) => {
                loaded.listings.extend(listings);
                loaded.lines_skipped += skipped;
                loaded.files_loaded += 1;
            }
            Err(e) => warn!("{e}"),
        }
    }

    debug!(
        "Loaded {} listings from {} files ({} lines skipped)",
        loaded.listings.len(),
        loaded.files_loaded,
        loaded.lines_skipped
    );
    Ok(loaded)
}

/// Read one listing file. Returns the listings and the number of skipped lines.
///
/// Listings without a state or collection date inherit them from the file name.
pub fn read_listing_file(file: &ListingFile) -> Result<(Vec<Listing>, usize)> {
    let handle = std::fs::File::open(&file.path).map_err(|source| SalaryError::FileRead {
        path: file.path.clone(),
        source,
    })?;

    let reader = std::io::BufReader::new(handle);
    let mut listings = Vec::new();
    let mut skipped = 0usize;

    for (line_no, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|source| SalaryError::FileRead {
            path: file.path.clone(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut listing: Listing = match serde_json::from_str(trimmed) {
            Ok(l) => l,
            Err(e) => {
                warn!(
                    "Skipping line {} of {}: {}",
                    line_no + 1,
                    file.path.display(),
                    e
                );
                skipped += 1;
                continue;
            }
        };

        if listing.state.as_deref().map_or(true, |s| s.trim().is_empty()) {
            listing.state = Some(file.state());
        }
        if listing.date_added.is_none() {
            listing.date_added = Some(file.date);
        }
        listings.push(listing);
    }

    Ok((listings, skipped))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use salary_core::dataset::DateFilter;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    fn all_states(title: &str) -> DatasetFilter {
        DatasetFilter::new(title, None, true, DateFilter::default()).unwrap()
    }

    // ── parse_listing_file ───────────────────────────────────────────────────

    #[test]
    fn test_parse_listing_file_multi_word_state() {
        let file = parse_listing_file(
            Path::new("/x/New_Jersey_Cyber_Analyst_jobs_2024-05-01.jsonl"),
            "Cyber_Analyst",
        )
        .unwrap();
        assert_eq!(file.state_label, "New_Jersey");
        assert_eq!(file.state(), "New Jersey");
        assert_eq!(file.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_parse_listing_file_rejects_other_titles_and_extensions() {
        assert!(parse_listing_file(Path::new("Ohio_Nurse_jobs_2024-05-01.jsonl"), "Analyst").is_none());
        assert!(parse_listing_file(Path::new("Ohio_Nurse_jobs_2024-05-01.csv"), "Nurse").is_none());
        assert!(parse_listing_file(Path::new("Ohio_Nurse_dataset_2024-05-01.jsonl"), "Nurse").is_none());
        assert!(parse_listing_file(Path::new("Nurse_jobs_2024-05-01.jsonl"), "Nurse").is_none());
    }

    // ── find_listing_files ───────────────────────────────────────────────────

    #[test]
    fn test_find_listing_files_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let err = find_listing_files(&tmp.path().join("nope"), &all_states("Nurse")).unwrap_err();
        assert!(matches!(err, SalaryError::DataPathNotFound(_)));
    }

    #[test]
    fn test_find_listing_files_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Texas_Nurse_jobs_2024-05-01.jsonl", &[]);
        write(tmp.path(), "Ohio_Nurse_jobs_2024-06-01.jsonl", &[]);
        write(tmp.path(), "ALL_STATES_Nurse_jobs_2024-06-01.jsonl", &[]);
        write(tmp.path(), "Ohio_Welder_jobs_2024-06-01.jsonl", &[]);

        let files = find_listing_files(tmp.path(), &all_states("Nurse")).unwrap();
        let labels: Vec<&str> = files.iter().map(|f| f.state_label.as_str()).collect();
        assert_eq!(labels, vec!["Ohio", "Texas"]);

        let june = DatasetFilter::new(
            "Nurse",
            None,
            true,
            DateFilter::new(Some(2024), Some(6), None).unwrap(),
        )
        .unwrap();
        let files = find_listing_files(tmp.path(), &june).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].state_label, "Ohio");
    }

    #[test]
    fn test_find_listing_files_single_state() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "New_York_Nurse_jobs_2024-05-01.jsonl", &[]);
        write(tmp.path(), "York_Nurse_jobs_2024-05-01.jsonl", &[]);
        let filter =
            DatasetFilter::new("Nurse", Some("New York"), false, DateFilter::default()).unwrap();
        let files = find_listing_files(tmp.path(), &filter).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].state(), "New York");
    }

    // ── load_listings ────────────────────────────────────────────────────────

    #[test]
    fn test_load_listings_fills_state_and_date_from_file_name() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "North_Dakota_Nurse_jobs_2024-05-01.jsonl",
            &[
                r#"{"job_title": "Nurse", "salary": "$40 an hour"}"#,
                r#"{"job_title": "Nurse", "state": "Minnesota", "date_added": "2024-04-30"}"#,
            ],
        );
        let loaded = load_listings(tmp.path(), &all_states("Nurse")).unwrap();
        assert_eq!(loaded.files_loaded, 1);
        assert_eq!(loaded.listings.len(), 2);
        assert_eq!(loaded.listings[0].state.as_deref(), Some("North Dakota"));
        assert_eq!(loaded.listings[0].month_key(), "2024-05");
        assert_eq!(loaded.listings[1].state.as_deref(), Some("Minnesota"));
        assert_eq!(loaded.listings[1].month_key(), "2024-04");
    }

    #[test]
    fn test_load_listings_skips_malformed_and_blank_lines() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "Ohio_Nurse_jobs_2024-05-01.jsonl",
            &[
                r#"{"salary": "50K"}"#,
                "",
                "{not json",
                r#"{"salary": "60K"}"#,
            ],
        );
        let loaded = load_listings(tmp.path(), &all_states("Nurse")).unwrap();
        assert_eq!(loaded.listings.len(), 2);
        assert_eq!(loaded.lines_skipped, 1);
    }

    #[test]
    fn test_load_listings_no_matching_files_is_empty() {
        let tmp = TempDir::new().unwrap();
        let loaded = load_listings(tmp.path(), &all_states("Nurse")).unwrap();
        assert!(loaded.listings.is_empty());
        assert_eq!(loaded.files_loaded, 0);
    }
}
