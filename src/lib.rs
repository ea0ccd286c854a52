// CMC Seed - Core Library
// Workbook → districts, campuses, people, needs, notes → JSON seed files

pub mod config;
pub mod entities;
pub mod output;
pub mod pipeline;
pub mod temporal;
pub mod workbook;

// Re-export commonly used types
pub use config::SeedConfig;
pub use entities::{
    Campus, CampusIndex, District, ExtractError, IdCounters, Need, Note, Person, RowOutcome,
    SkipCounts, SkipReason,
};
pub use output::{write_seed_files, SeedFiles};
pub use pipeline::{build_seed_data, SeedData, SeedSummary};
pub use temporal::{Clock, FixedClock, SystemClock};
pub use workbook::{
    open_source, CellValue, CsvDirectory, Row, SheetLayout, SheetSource, WorkbookError,
    XlsxWorkbook,
};

use anyhow::{Context, Result};
use tracing::info;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load the configured workbook, extract everything and write the seed files
pub fn run(config: &SeedConfig) -> Result<(SeedData, SeedFiles)> {
    let mut source = open_source(&config.workbook)
        .with_context(|| format!("Failed to open {}", config.workbook.display()))?;
    info!(source = %source.describe(), "loading sheets");

    let clock = config.clock();
    let data = build_seed_data(source.as_mut(), clock.as_ref())?;
    let files = write_seed_files(&config.out_dir, &data)?;

    info!(total = data.skipped.total(), "rows skipped");
    for (reason, count) in data.skipped.iter() {
        info!(%reason, count, "rows skipped");
    }
    info!(out_dir = %config.out_dir.display(), "seed files written");

    Ok((data, files))
}
