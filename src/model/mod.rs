//! Series model: normalized snapshots plus the summary derived from them.

pub mod normalize;
pub mod stats;

pub use normalize::Normalizer;
pub use stats::{Recommendation, SeriesSummary};

use crate::log::{ExtractStats, SnapshotExtractor};
use crate::Result;

use chrono::{DateTime, Local};
use std::io::BufRead;
use tracing::warn;

/// One normalized observation.
///
/// `timestamp` is wall-clock time at normalization, not a value read from the
/// stats dump, so it orders samples by read position only.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    pub mem_usage_mib: f64,
    pub cpu_percent: f64,
    pub cpu_mcpu: f64,
}

/// All snapshots of one run, in read order.
#[derive(Debug, Clone, Default)]
pub struct Series {
    pub snapshots: Vec<Snapshot>,
    pub extract: ExtractStats,
    /// Parsed fragments whose first element failed normalization.
    pub rejected: usize,
}

impl Series {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Fragments that produced no snapshot, for whatever reason.
    pub fn dropped(&self) -> usize {
        self.extract.dropped() + self.rejected
    }
}

/// Build a series in one forward pass over `reader`.
///
/// `clock` stamps each accepted snapshot. Malformed fragments and snapshots
/// that fail normalization are logged and skipped; only I/O errors abort.
pub fn build_series<R, C>(reader: R, normalizer: &Normalizer, mut clock: C) -> Result<Series>
where
    R: BufRead,
    C: FnMut() -> DateTime<Local>,
{
    let mut extractor = SnapshotExtractor::new(reader);
    let mut series = Series::default();

    for value in extractor.by_ref() {
        let value = value?;
        match normalizer.normalize(value, clock()) {
            Ok(snapshot) => series.snapshots.push(snapshot),
            Err(e) => {
                series.rejected += 1;
                warn!(error = %e, "skipping snapshot");
            }
        }
    }

    series.extract = extractor.stats();
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn fixed_clock() -> impl FnMut() -> DateTime<Local> {
        let start = Local.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        let mut tick = 0;
        move || {
            tick += 1;
            start + chrono::Duration::seconds(tick)
        }
    }

    #[test]
    fn builds_series_in_read_order() {
        let input = r#"[
  {"mem_usage": "100MB / 8GB", "cpu_percent": "5%"}
]
[
  {"mem_usage": "1GB / 8GB", "cpu_percent": "12,5%"}
]
"#;
        let normalizer = Normalizer::new().unwrap();
        let series = build_series(input.as_bytes(), &normalizer, fixed_clock()).unwrap();

        let mem: Vec<f64> = series.snapshots.iter().map(|s| s.mem_usage_mib).collect();
        let cpu: Vec<f64> = series.snapshots.iter().map(|s| s.cpu_mcpu).collect();
        assert_eq!(mem, vec![100.0, 1024.0]);
        assert_eq!(cpu, vec![50.0, 125.0]);
        assert!(series.snapshots[0].timestamp < series.snapshots[1].timestamp);
        assert_eq!(series.dropped(), 0);
    }

    #[test]
    fn rejected_and_malformed_fragments_are_counted() {
        let input = "[{\"mem_usage\": \"1MB / 1GB\", \"cpu_percent\": \"n/a\"}]\n\
                     not json]\n\
                     [{\"mem_usage\": \"2MB / 1GB\", \"cpu_percent\": \"1%\"}]\n\
                     [{\"mem_usage\": \"3MB / 1GB\"\n";
        let normalizer = Normalizer::new().unwrap();
        let series = build_series(input.as_bytes(), &normalizer, fixed_clock()).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.snapshots[0].mem_usage_mib, 2.0);
        assert_eq!(series.rejected, 1);
        assert_eq!(series.extract.malformed, 1);
        assert_eq!(series.extract.unterminated, 1);
        assert_eq!(series.dropped(), 3);
    }
}
