//! Unit normalization for one raw snapshot.
//!
//! Memory strings look like "5.112MB / 7.716GB" (usage / total); only the
//! usage side is read and converted to MiB. CPU strings look like "6.05%" or,
//! from comma-decimal locales, "6,05%".

use crate::log::RawSnapshot;
use crate::model::Snapshot;

use chrono::{DateTime, Local};
use regex::Regex;
use serde_json::Value;
use std::num::ParseFloatError;
use thiserror::Error;

/// One full core expressed in milli-cores, i.e. 100% == 1000m.
const MILLICORES_PER_PERCENT: f64 = 10.0;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("snapshot has unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("invalid cpu_percent {raw:?}")]
    InvalidCpu {
        raw: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("cpu_percent {raw:?} is not a finite quantity")]
    NonFiniteCpu { raw: String },
}

pub struct Normalizer {
    mem_re: Regex,
}

impl Normalizer {
    pub fn new() -> anyhow::Result<Self> {
        // Capture:
        // 1) number: digits and dots, validated by f64 parsing afterwards
        // 2) unit: B, KB/MB/GB or KiB/MiB/GiB
        let mem_re = Regex::new(r"^([0-9.]+)(B|[KMG]i?B)")?;
        Ok(Self { mem_re })
    }

    /// Normalize the first element of a stats array, stamping it with `timestamp`.
    pub fn normalize(
        &self,
        value: Value,
        timestamp: DateTime<Local>,
    ) -> Result<Snapshot, NormalizeError> {
        let raw: RawSnapshot = serde_json::from_value(value)?;

        let mem_usage_mib = self.memory_mib(raw.mem_usage.as_deref().unwrap_or(""));
        let cpu_percent = cpu_percent(raw.cpu_percent.as_deref().unwrap_or("0"))?;

        Ok(Snapshot {
            timestamp,
            mem_usage_mib,
            cpu_percent,
            cpu_mcpu: cpu_percent * MILLICORES_PER_PERCENT,
        })
    }

    /// Usage side of "<usage> / <total>" in MiB; 0.0 when it cannot be read.
    pub fn memory_mib(&self, mem_usage: &str) -> f64 {
        let usage = mem_usage.split('/').next().unwrap_or("").trim();

        let Some(caps) = self.mem_re.captures(usage) else {
            return 0.0;
        };
        let (number, unit) = (&caps[1], &caps[2]);

        match number.parse::<f64>() {
            Ok(n) if (n * unit_factor(unit)).is_finite() => n * unit_factor(unit),
            _ => 0.0,
        }
    }
}

/// Scale to MiB. Decimal and binary prefixes are treated alike.
fn unit_factor(unit: &str) -> f64 {
    match unit {
        "KB" | "KiB" => 1.0 / 1024.0,
        "GB" | "GiB" => 1024.0,
        _ => 1.0,
    }
}

/// Parse "6.05%" / "6,05%" into 6.05.
///
/// "inf", "nan" and values that overflow once scaled to milli-cores are rejected.
pub fn cpu_percent(raw: &str) -> Result<f64, NormalizeError> {
    let cleaned = raw.replace('%', "").replace(',', ".");
    let percent = cleaned
        .trim()
        .parse::<f64>()
        .map_err(|source| NormalizeError::InvalidCpu {
            raw: raw.to_string(),
            source,
        })?;

    if !(percent * MILLICORES_PER_PERCENT).is_finite() {
        return Err(NormalizeError::NonFiniteCpu {
            raw: raw.to_string(),
        });
    }
    Ok(percent)
}
