//! Summary statistics and the request/limit recommendation derived from them.

use crate::model::Series;
use crate::Result;

use anyhow::bail;
use std::fmt;

/// Headroom added on top of observed memory before rounding.
const MEMORY_BUFFER_MIB: f64 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub samples: usize,
    pub mem_mean: f64,
    pub mem_max: f64,
    pub cpu_mean: f64,
    pub cpu_max: f64,
}

impl SeriesSummary {
    /// Mean and max of memory (MiB) and CPU (milli-cores). Errors on an empty series.
    pub fn from_series(series: &Series) -> Result<Self> {
        if series.is_empty() {
            bail!(
                "no snapshots parsed ({} fragments tried, {} dropped)",
                series.extract.fragments,
                series.dropped()
            );
        }

        let mut summary = SeriesSummary {
            samples: series.len(),
            mem_mean: 0.0,
            mem_max: f64::NEG_INFINITY,
            cpu_mean: 0.0,
            cpu_max: f64::NEG_INFINITY,
        };
        // Running mean, so large samples cannot overflow a sum.
        for (i, s) in series.snapshots.iter().enumerate() {
            let k = (i + 1) as f64;
            summary.mem_mean += (s.mem_usage_mib - summary.mem_mean) / k;
            summary.cpu_mean += (s.cpu_mcpu - summary.cpu_mean) / k;
            summary.mem_max = summary.mem_max.max(s.mem_usage_mib);
            summary.cpu_max = summary.cpu_max.max(s.cpu_mcpu);
        }

        Ok(summary)
    }
}

/// Kubernetes-style resource quantities: requests from the mean, limits from the max.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub cpu_request: String,
    pub cpu_limit: String,
    pub mem_request: String,
    pub mem_limit: String,
}

impl Recommendation {
    pub fn from_summary(summary: &SeriesSummary) -> Self {
        Self {
            cpu_request: format_cpu(summary.cpu_mean),
            cpu_limit: format_cpu(summary.cpu_max),
            mem_request: format_mem(summary.mem_mean),
            mem_limit: format_mem(summary.mem_max),
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Kubernetes resource recommendation:")?;
        writeln!(f, "  requests:")?;
        writeln!(f, "    memory: {}", self.mem_request)?;
        writeln!(f, "    cpu:    {}", self.cpu_request)?;
        writeln!(f, "  limits:")?;
        writeln!(f, "    memory: {}", self.mem_limit)?;
        write!(f, "    cpu:    {}", self.cpu_limit)
    }
}

/// Milli-cores rounded half away from zero: 55.5 -> "56m".
pub fn format_cpu(mcpu: f64) -> String {
    format!("{}m", mcpu.round() as i64)
}

/// MiB plus the fixed buffer, rounded half away from zero: 100.0 -> "108Mi".
pub fn format_mem(mib: f64) -> String {
    format!("{}Mi", (mib + MEMORY_BUFFER_MIB).round() as i64)
}
