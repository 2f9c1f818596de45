use crate::model::Snapshot;
use crate::Result;

use anyhow::Context;
use chrono::SecondsFormat;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const HEADER: &str = "timestamp,mem_usage_mib,cpu_percent,cpu_mcpu";

/// Write the series as CSV. Every field is numeric or RFC 3339, so no quoting is needed.
pub fn write_csv<W: Write>(mut w: W, snapshots: &[Snapshot]) -> Result<()> {
    writeln!(w, "{}", HEADER)?;
    for s in snapshots {
        writeln!(
            w,
            "{},{},{},{}",
            s.timestamp.to_rfc3339_opts(SecondsFormat::Micros, false),
            s.mem_usage_mib,
            s.cpu_percent,
            s.cpu_mcpu
        )?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, snapshots: &[Snapshot]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("create csv file {}", path.display()))?;
    write_csv(BufWriter::new(file), snapshots)
        .with_context(|| format!("write csv file {}", path.display()))
}
