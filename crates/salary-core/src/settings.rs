use clap::{Args, CommandFactory, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::dataset::{DatasetFilter, DateFilter};
use crate::error::Result;

// ── Paths ──────────────────────────────────────────────────────────────────────

/// `~/.jobsearch`, the root of all persisted state.
pub fn jobsearch_home() -> PathBuf {
    jobsearch_home_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
}

/// `.jobsearch` rooted at `base_dir` (used for testing).
pub fn jobsearch_home_in(base_dir: &Path) -> PathBuf {
    base_dir.join(".jobsearch")
}

/// Default listings directory, `~/.jobsearch/Job_Listings`.
pub fn default_data_dir() -> PathBuf {
    jobsearch_home().join("Job_Listings")
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Parse job-listing salaries and report salary statistics
#[derive(Parser, Debug, Clone)]
#[command(
    name = "jobsearch",
    about = "Parse job-listing salaries and report salary statistics",
    version
)]
pub struct Settings {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding listing files (default: ~/.jobsearch/Job_Listings)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long, global = true)]
    pub clear: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Parse salary strings and print the resulting records
    Parse {
        /// Salary text, e.g. "$30-37.50/hr"
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Aggregate salary statistics over stored listings
    Stats {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Grouping key
        #[arg(long, default_value = "state", value_parser = ["state", "month", "title", "unit"])]
        group_by: String,
    },

    /// Write listings enriched with parsed salaries as JSON lines
    Enrich {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Which listing files to load.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct DatasetArgs {
    /// Job title to compile (ex. 'Cybersecurity Analyst')
    #[arg(long)]
    pub job: String,

    /// State to compile (ex. 'New Jersey')
    #[arg(long, conflicts_with = "all", required_unless_present = "all")]
    pub state: Option<String>,

    /// Use all US states
    #[arg(long)]
    pub all: bool,

    /// Year (YYYY)
    #[arg(long)]
    pub year: Option<i32>,

    /// Month (1-12)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Day (1-31)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
    pub day: Option<u32>,

    /// Full date 'YYYY-MM-DD' (overrides --year/--month/--day)
    #[arg(long)]
    pub date: Option<String>,
}

impl DatasetArgs {
    /// Validate the arguments into a [`DatasetFilter`].
    pub fn to_filter(&self) -> Result<DatasetFilter> {
        let dates = match &self.date {
            Some(date) => DateFilter::from_date_str(date)?,
            None => DateFilter::new(self.year, self.month, self.day)?,
        };
        DatasetFilter::new(&self.job, self.state.as_deref(), self.all, dates)
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.jobsearch/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
}

impl LastUsedParams {
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        jobsearch_home_in(base_dir).join("last_used.json")
    }

    /// Load persisted params; `Default` when the file is absent or corrupt.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params, creating parent directories if needed.
    pub fn save_to(&self, path: &Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Fill fields missing from `self` with the values from `older`.
    fn or(self, older: LastUsedParams) -> Self {
        Self {
            data_dir: self.data_dir.or(older.data_dir),
            format: self.format.or(older.format),
            group_by: self.group_by.or(older.group_by),
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation; accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return settings.apply_debug();
        }

        let last = LastUsedParams::load_from(config_path);

        if settings.data_dir.is_none() {
            settings.data_dir = last.data_dir.clone();
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = &last.format {
                settings.format = v.clone();
            }
        }
        if let Command::Stats { group_by, .. } = &mut settings.command {
            let explicit = matches
                .subcommand_matches("stats")
                .is_some_and(|sub| is_arg_explicitly_set(sub, "group_by"));
            if !explicit {
                if let Some(v) = &last.group_by {
                    *group_by = v.clone();
                }
            }
        }

        let params = LastUsedParams::from(&settings).or(last);
        let _ = params.save_to(config_path);

        settings.apply_debug()
    }

    /// Listings directory in effect.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }

    fn apply_debug(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        let group_by = match &s.command {
            Command::Stats { group_by, .. } => Some(group_by.clone()),
            _ => None,
        };
        LastUsedParams {
            data_dir: s.data_dir.clone(),
            format: Some(s.format.clone()),
            group_by,
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
