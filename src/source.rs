//! Input selection and output naming.
//!
//! Input is either an explicit path or the lexicographically-last file in a
//! directory matching a glob (default `raw_stats_*.json`). Outputs are named
//! from the input file name:
//!   raw_stats_<suffix>.json -> benchmark_timeseries_<suffix>.csv
//!   raw_stats_<suffix>.json -> benchmark_plot_<suffix>_plot.png

use crate::Result;

use anyhow::{Context, bail};
use glob::{Pattern, glob};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_PATTERN: &str = "raw_stats_*.json";

#[derive(Debug, Clone)]
pub enum InputSource {
    Explicit(PathBuf),
    Latest { dir: PathBuf, pattern: String },
}

impl InputSource {
    pub fn resolve(&self) -> Result<PathBuf> {
        match self {
            InputSource::Explicit(path) => {
                if !path.is_file() {
                    bail!("input file {} does not exist", path.display());
                }
                Ok(path.clone())
            }
            InputSource::Latest { dir, pattern } => latest_match(dir, pattern),
        }
    }
}

/// Last match of `dir/pattern`, ordered by file name.
fn latest_match(dir: &Path, pattern: &str) -> Result<PathBuf> {
    let dir_str = dir
        .to_str()
        .with_context(|| format!("non UTF-8 search directory {}", dir.display()))?;
    // Only `pattern` is a glob; the directory is matched literally.
    let full = Path::new(&Pattern::escape(dir_str)).join(pattern);
    let full = full
        .to_str()
        .with_context(|| format!("non UTF-8 search path {}", full.display()))?;

    let mut files = Vec::new();
    for entry in glob(full).with_context(|| format!("bad file pattern {}", pattern))? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(path) => debug!(path = %path.display(), "ignoring non-file match"),
            Err(e) => warn!(error = %e, "failed to read glob entry"),
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    match files.pop() {
        Some(path) => Ok(path),
        None => bail!(
            "no raw stats files matching {} found in {}",
            pattern,
            dir.display()
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub plot: PathBuf,
}

impl OutputPaths {
    /// Derive artifact paths from the input file name, placed in `out_dir`
    /// or next to the input.
    pub fn derive(input: &Path, out_dir: Option<&Path>) -> Result<Self> {
        let name = input
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("input path {} has no usable file name", input.display()))?;

        let dir = match out_dir {
            Some(d) => d.to_path_buf(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };

        let csv = replace_extension(&name.replace("raw_stats_", "benchmark_timeseries_"), ".csv");
        let plot = replace_extension(name, "_plot.png").replace("raw_stats_", "benchmark_plot_");

        Ok(Self {
            csv: dir.join(csv),
            plot: dir.join(plot),
        })
    }
}

/// Replace every ".json" with `suffix`; append it when there is none.
fn replace_extension(name: &str, suffix: &str) -> String {
    if name.contains(".json") {
        name.replace(".json", suffix)
    } else {
        format!("{}{}", name, suffix)
    }
}
