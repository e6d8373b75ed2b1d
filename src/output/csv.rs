// src/output/csv.rs

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::{fs::File, io::Write, path::Path};
use tracing::{debug, instrument};

use super::record::{ProductionRecord, HEADER};

/// Write `records` to `path` as CSV. The header row is always written, also for
/// an empty record set. Returns the number of data lines written.
#[instrument(level = "info", skip(path, records), fields(path = %path.as_ref().display()))]
pub fn write_records<P: AsRef<Path>>(path: P, records: &[ProductionRecord]) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {:?}", parent))?;
    }
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let written = write_to(file, records)?;
    debug!(rows = written, "csv written");
    Ok(written)
}

/// Same as `write_records` for any writer.
pub fn write_to<W: Write>(writer: W, records: &[ProductionRecord]) -> Result<usize> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADER).context("writing CSV header")?;
    for (idx, record) in records.iter().enumerate() {
        wtr.serialize(record)
            .with_context(|| format!("writing CSV record {}", idx))?;
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(records.len())
}
