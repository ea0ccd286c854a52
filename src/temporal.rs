// ⏰ Temporal Model - lastUpdated normalization
// Time must be explicit: the fallback "now" comes from an injected Clock,
// never from a hidden call to the wall clock inside the extractors.

use chrono::{Local, NaiveDateTime};

use crate::workbook::CellValue;

/// Output format for every `lastUpdated` value
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted textual timestamp shapes (space or ISO `T` separator)
const PARSE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

// ============================================================================
// CLOCK
// ============================================================================

/// Source of "now" for rows that carry no timestamp
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time at the moment of the call
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant (reproducible runs, tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse "YYYY-MM-DD HH:MM:SS" (or the ISO `T` form, fractional seconds allowed)
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    PARSE_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(raw, fmt)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, &format!("{fmt}%.f")))
            .ok()
    })
}

/// Structured date/time cells are formatted as-is; anything else
/// (empty, text, numbers) falls back to the clock.
pub fn normalize_last_updated(cell: &CellValue, clock: &dyn Clock) -> String {
    match cell.as_datetime() {
        Some(dt) => format_timestamp(&dt),
        None => format_timestamp(&clock.now()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
