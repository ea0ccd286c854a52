// ⚙️ Run configuration
// Running with no arguments uses the fixed default paths.

use chrono::NaiveDateTime;
use clap::Parser;
use std::path::PathBuf;

use crate::temporal::{parse_timestamp, Clock, FixedClock, SystemClock};

pub const DEFAULT_WORKBOOK: &str = "CMC_Go_Sample_Data_Regenerated.xlsx";
pub const DEFAULT_OUT_DIR: &str = "scripts";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "cmc-seed",
    version,
    about = "Convert the sample data workbook into JSON seed files"
)]
pub struct SeedConfig {
    /// Source workbook (.xlsx), or a directory of <Sheet>.csv exports
    #[arg(long, env = "CMC_SEED_WORKBOOK", default_value = DEFAULT_WORKBOOK)]
    pub workbook: PathBuf,

    /// Directory that receives the seed-*.json files
    #[arg(long, env = "CMC_SEED_OUT_DIR", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Fixed "now" for rows without a timestamp, "YYYY-MM-DD HH:MM:SS"
    #[arg(long, value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,
}

fn parse_now(raw: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(raw).ok_or_else(|| format!("expected YYYY-MM-DD HH:MM:SS, got '{raw}'"))
}

impl SeedConfig {
    /// Clock used for the lastUpdated fallback
    pub fn clock(&self) -> Box<dyn Clock> {
        match self.now {
            Some(now) => Box::new(FixedClock(now)),
            None => Box::new(SystemClock),
        }
    }
}
