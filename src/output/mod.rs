pub mod csv;
pub mod record;

use std::path::PathBuf;

pub use self::csv::write_records;
pub use record::{project, ProductionRecord, HEADER};

/// End-of-run counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub rows_located: usize,
    pub records_written: usize,
    pub rows_rejected: usize,
    pub output: PathBuf,
}
