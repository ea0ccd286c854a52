// 🗺️ District Entity - identity is the slug
// First row carrying a slug wins; later rows with the same slug are dropped.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use super::{RowOutcome, SkipCounts, SkipReason};
use crate::workbook::{Row, SheetLayout};

pub const DISTRICT_SHEET: &str = "RegionsDistricts";

/// Columns: region, district name, district slug
pub const DISTRICT_COLUMNS: usize = 3;

pub const DISTRICT_LAYOUT: SheetLayout = SheetLayout::new(DISTRICT_SHEET, DISTRICT_COLUMNS);

const COL_REGION: usize = 0;
const COL_NAME: usize = 1;
const COL_SLUG: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    /// Slug, e.g. "northside"
    pub id: String,
    pub name: String,
    pub region: String,
}

/// Decide one row against the slugs emitted so far
pub fn district_from_row(row: &Row, seen: &HashSet<String>) -> RowOutcome<District> {
    let slug = match row.cell(COL_SLUG).present_text() {
        Some(slug) => slug,
        None => return RowOutcome::Skipped(SkipReason::EmptySlug),
    };

    if seen.contains(&slug) {
        return RowOutcome::Skipped(SkipReason::DuplicateSlug);
    }

    RowOutcome::Emitted(District {
        id: slug,
        name: row.cell(COL_NAME).as_text().unwrap_or_default(),
        region: row.cell(COL_REGION).as_text().unwrap_or_default(),
    })
}

/// Districts in first-seen order, one per slug
pub fn extract_districts(rows: &[Row], skips: &mut SkipCounts) -> Vec<District> {
    let mut seen = HashSet::new();
    let mut districts = Vec::new();

    for row in rows {
        match district_from_row(row, &seen) {
            RowOutcome::Emitted(district) => {
                seen.insert(district.id.clone());
                districts.push(district);
            }
            RowOutcome::Skipped(reason) => {
                debug!(sheet = DISTRICT_SHEET, row = row.number, %reason, "skipping row");
                skips.record(reason);
            }
        }
    }

    districts
}
