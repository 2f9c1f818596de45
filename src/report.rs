//! The `report` pipeline: select input, extract and normalize snapshots,
//! summarize, then write the CSV and (optionally) the chart.

use crate::host::HostInfo;
use crate::model::{self, Normalizer, Recommendation, Series, SeriesSummary};
use crate::render;
use crate::source::{InputSource, OutputPaths};
use crate::Result;

use anyhow::Context;
use chrono::Local;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub source: InputSource,
    pub out_dir: Option<PathBuf>,
    pub plot: bool,
}

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub input: PathBuf,
    pub csv: PathBuf,
    pub plot: Option<PathBuf>,
    pub summary: SeriesSummary,
    pub recommendation: Recommendation,
    pub dropped: usize,
}

pub fn run(opts: &ReportOptions) -> Result<ReportOutcome> {
    let input = opts.source.resolve()?;
    info!(input = %input.display(), "reading raw stats");

    let file = File::open(&input).with_context(|| format!("open {}", input.display()))?;
    let normalizer = Normalizer::new()?;
    let series = model::build_series(BufReader::new(file), &normalizer, Local::now)
        .with_context(|| format!("read {}", input.display()))?;
    log_series(&series);

    // Fails on an empty series, before anything is written.
    let summary = SeriesSummary::from_series(&series)
        .with_context(|| format!("summarize {}", input.display()))?;
    let recommendation = Recommendation::from_summary(&summary);

    let paths = OutputPaths::derive(&input, opts.out_dir.as_deref())?;

    render::write_csv_file(&paths.csv, &series.snapshots)?;
    info!(path = %paths.csv.display(), rows = series.len(), "saved time series");

    let plot = if opts.plot {
        let host = HostInfo::detect();
        render::render_plot(&paths.plot, &series.snapshots, &host, &recommendation)?;
        info!(path = %paths.plot.display(), "saved plot");
        Some(paths.plot)
    } else {
        None
    };

    Ok(ReportOutcome {
        input,
        csv: paths.csv,
        plot,
        summary,
        recommendation,
        dropped: series.dropped(),
    })
}

fn log_series(series: &Series) {
    let stats = series.extract;
    info!(
        snapshots = series.len(),
        fragments = stats.fragments,
        ignored_elements = stats.extra_elements,
        "parsed raw stats"
    );
    if series.dropped() > 0 {
        warn!(
            malformed = stats.malformed,
            rejected = series.rejected,
            unterminated = stats.unterminated,
            "some fragments produced no snapshot"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DEFAULT_PATTERN;
    use pretty_assertions::assert_eq;
    use std::fs;

    const RAW: &str = r#"[
  {"name": "app", "mem_usage": "50MiB / 7.6GiB", "cpu_percent": "2.10%"}
]
[
  {"name": "app", "mem_usage": "150MiB / 7.6GiB", "cpu_percent": "9,00%"}
]
[
  {"name": "app", "mem_usage": "
"#;

    fn latest(dir: &std::path::Path) -> InputSource {
        InputSource::Latest {
            dir: dir.to_path_buf(),
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }

    #[test]
    fn writes_csv_and_recommendation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("raw_stats_old.json"), "[]").unwrap();
        fs::write(dir.path().join("raw_stats_run.json"), RAW).unwrap();

        let outcome = run(&ReportOptions {
            source: latest(dir.path()),
            out_dir: None,
            plot: false,
        })
        .unwrap();

        assert_eq!(outcome.input, dir.path().join("raw_stats_run.json"));
        assert_eq!(outcome.csv, dir.path().join("benchmark_timeseries_run.csv"));
        assert_eq!(outcome.plot, None);
        assert_eq!(outcome.summary.samples, 2);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(
            outcome.recommendation,
            Recommendation {
                cpu_request: "56m".into(),
                cpu_limit: "90m".into(),
                mem_request: "108Mi".into(),
                mem_limit: "158Mi".into(),
            }
        );

        let csv = fs::read_to_string(&outcome.csv).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(!dir.path().join("benchmark_plot_run_plot.png").exists());
    }

    #[test]
    fn renders_plot_despite_non_finite_cpu() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw_stats_cpu.json");
        let raw = r#"[{"mem_usage": "50MiB / 7.6GiB", "cpu_percent": "2.10%"}]
[{"mem_usage": "5MB / 1GB", "cpu_percent": "inf%"}]
[{"mem_usage": "150MiB / 7.6GiB", "cpu_percent": "9,00%"}]
[{"mem_usage": "5MB / 1GB", "cpu_percent": "1e308%"}]
"#;
        fs::write(&input, raw).unwrap();

        let outcome = run(&ReportOptions {
            source: InputSource::Explicit(input),
            out_dir: None,
            plot: true,
        })
        .unwrap();

        let plot = dir.path().join("benchmark_plot_cpu_plot.png");
        assert_eq!(outcome.plot, Some(plot.clone()));
        assert!(fs::metadata(&plot).unwrap().len() > 0);
        assert_eq!(outcome.summary.samples, 2);
        assert_eq!(outcome.dropped, 2);
        assert_eq!(outcome.recommendation.cpu_limit, "90m");
    }

    #[test]
    fn no_input_files_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&ReportOptions {
            source: latest(dir.path()),
            out_dir: None,
            plot: true,
        })
        .unwrap_err();

        assert!(err.to_string().contains("no raw stats files"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn unparsable_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw_stats_bad.json");
        fs::write(&input, "garbage]\n[\n").unwrap();

        let err = run(&ReportOptions {
            source: InputSource::Explicit(input),
            out_dir: None,
            plot: true,
        })
        .unwrap_err();

        assert!(format!("{:#}", err).contains("no snapshots parsed"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
