// 🔁 Seed Pipeline - Districts → Campuses → People/Needs/Notes
// One forward pass; each stage only reads what earlier stages produced.

use anyhow::{Context, Result};
use std::fmt;
use tracing::{info, warn};

use crate::entities::campus::{CAMPUS_LAYOUT, CAMPUS_SHEET};
use crate::entities::district::{DISTRICT_LAYOUT, DISTRICT_SHEET};
use crate::entities::person::{PEOPLE_LAYOUT, PEOPLE_SHEET};
use crate::entities::{
    extract_campuses, extract_districts, extract_people, Campus, CampusIndex, District, Need,
    Note, Person, SkipCounts,
};
use crate::temporal::Clock;
use crate::workbook::SheetSource;

/// The five collections, built once and never mutated afterwards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedData {
    pub districts: Vec<District>,
    pub campuses: Vec<Campus>,
    pub people: Vec<Person>,
    pub needs: Vec<Need>,
    pub notes: Vec<Note>,
    /// Rows that produced nothing, by reason
    pub skipped: SkipCounts,
}

impl SeedData {
    pub fn summary(&self) -> SeedSummary {
        SeedSummary {
            districts: self.districts.len(),
            campuses: self.campuses.len(),
            people: self.people.len(),
            needs: self.needs.len(),
            notes: self.notes.len(),
        }
    }
}

/// Record totals, printed after a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub districts: usize,
    pub campuses: usize,
    pub people: usize,
    pub needs: usize,
    pub notes: usize,
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generated seed data:")?;
        writeln!(f, "  {} districts", self.districts)?;
        writeln!(f, "  {} campuses", self.campuses)?;
        writeln!(f, "  {} people", self.people)?;
        writeln!(f, "  {} needs", self.needs)?;
        write!(f, "  {} notes", self.notes)
    }
}

/// Read the three sheets in fixed order and build every collection.
/// Any sheet-level failure aborts; row-level problems are skipped and counted.
pub fn build_seed_data(source: &mut dyn SheetSource, clock: &dyn Clock) -> Result<SeedData> {
    let mut skipped = SkipCounts::new();

    // 1. Districts
    let district_rows = source
        .rows(&DISTRICT_LAYOUT)
        .with_context(|| format!("Failed to load sheet '{DISTRICT_SHEET}'"))?;
    let districts = extract_districts(&district_rows, &mut skipped);
    info!(rows = district_rows.len(), districts = districts.len(), "districts extracted");

    // 2. Campuses
    let campus_rows = source
        .rows(&CAMPUS_LAYOUT)
        .with_context(|| format!("Failed to load sheet '{CAMPUS_SHEET}'"))?;
    let campuses = extract_campuses(&campus_rows, &mut skipped)
        .with_context(|| format!("Failed to extract sheet '{CAMPUS_SHEET}'"))?;
    info!(rows = campus_rows.len(), campuses = campuses.len(), "campuses extracted");

    // 3. People (+ needs, notes), resolved against the campuses above
    let people_rows = source
        .rows(&PEOPLE_LAYOUT)
        .with_context(|| format!("Failed to load sheet '{PEOPLE_SHEET}'"))?;
    let index = CampusIndex::from_campuses(&campuses);
    info!(keys = index.len(), "campus index built");
    if index.is_empty() && !people_rows.is_empty() {
        warn!(rows = people_rows.len(), "no campuses to match people against");
    }
    let extracted = extract_people(&people_rows, &index, clock, &mut skipped);
    info!(
        rows = people_rows.len(),
        people = extracted.people.len(),
        needs = extracted.needs.len(),
        notes = extracted.notes.len(),
        "people extracted"
    );

    Ok(SeedData {
        districts,
        campuses,
        people: extracted.people,
        needs: extracted.needs,
        notes: extracted.notes,
        skipped,
    })
}
