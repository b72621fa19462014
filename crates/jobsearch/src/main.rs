mod bootstrap;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use salary_core::builder::build_batch;
use salary_core::settings::{Command, DatasetArgs, Settings};
use salary_data::enrich::{analyze, enrich, write_enriched, write_enriched_file, GroupKey};
use salary_data::reader::load_listings;
use salary_report::{render_json, render_records_table, render_stats_table, render_summary};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::debug!("jobsearch v{} starting", env!("CARGO_PKG_VERSION"));

    let data_dir = settings.resolved_data_dir();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &settings.command {
        Command::Parse { texts } => {
            let raws: Vec<Option<&str>> = texts.iter().map(|t| Some(t.as_str())).collect();
            let records = build_batch(&raws);
            if settings.is_json() {
                writeln!(out, "{}", render_json(&records)?)?;
            } else {
                write!(out, "{}", render_records_table(&records))?;
            }
        }

        Command::Stats { dataset, group_by } => {
            let group_by: GroupKey = group_by.parse()?;
            let filter = dataset.to_filter()?;
            tracing::info!(
                "Aggregating '{}' listings from {} by {}",
                filter.job_title(),
                data_dir.display(),
                group_by
            );

            let report = analyze(&data_dir, &filter, group_by)?;
            if settings.is_json() {
                writeln!(out, "{}", render_json(&report)?)?;
            } else {
                writeln!(
                    out,
                    "{} listings from {} files\n",
                    report.listings_loaded, report.files_loaded
                )?;
                write!(
                    out,
                    "{}",
                    render_stats_table(
                        report.aggregation.groups(),
                        &report.aggregation.counts(),
                        group_by.label(),
                    )
                )?;
                if let Some(summary) = &report.summary {
                    write!(out, "\n{}", render_summary(summary))?;
                }
            }
        }

        Command::Enrich { dataset, output } => {
            run_enrich(&data_dir, dataset, output.as_deref(), &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Load, enrich and write listings to `output`, or to `out` when no file is given.
fn run_enrich(
    data_dir: &Path,
    dataset: &DatasetArgs,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let filter = dataset.to_filter()?;
    let loaded = load_listings(data_dir, &filter)?;
    let enriched = enrich(loaded.listings);

    match output {
        Some(path) => {
            write_enriched_file(&enriched, path)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Wrote {} enriched listings to {}", enriched.len(), path.display());
        }
        None => write_enriched(&enriched, out)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dataset(job: &str) -> DatasetArgs {
        DatasetArgs {
            job: job.to_string(),
            state: None,
            all: true,
            year: None,
            month: None,
            day: None,
            date: None,
        }
    }

    #[test]
    fn test_run_enrich_to_writer() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("Ohio_Welder_jobs_2024-03-04.jsonl"),
            "{\"salary\": \"$25 - $30 an hour\"}\n{\"salary\": \"DOE\"}\n",
        )
        .unwrap();

        let mut buf = Vec::new();
        run_enrich(tmp.path(), &dataset("Welder"), None, &mut buf).unwrap();

        let lines: Vec<serde_json::Value> = String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["state"], "Ohio");
        assert_eq!(lines[0]["salary_parsed"]["unit"], "hour");
        assert_eq!(lines[0]["salary_parsed"]["average_annual"], 57_200.0);
        assert_eq!(lines[1]["salary_parsed"]["status"], "unparseable");
    }

    #[test]
    fn test_run_enrich_to_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("Texas_Welder_jobs_2024-03-04.jsonl"),
            "{\"salary\": \"50K\"}\n",
        )
        .unwrap();
        let target = tmp.path().join("enriched").join("welder.jsonl");

        let mut buf = Vec::new();
        run_enrich(tmp.path(), &dataset("Welder"), Some(&target), &mut buf).unwrap();

        assert!(buf.is_empty());
        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(written.lines().count(), 1);
    }

    #[test]
    fn test_run_enrich_rejects_bad_filter() {
        let tmp = TempDir::new().unwrap();
        let mut args = dataset("Welder");
        args.month = Some(3);
        let err = run_enrich(tmp.path(), &args, None, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("year is required"));
    }
}
