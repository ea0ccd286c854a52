// 👤 Person Entity - plus the Need and Note records a person row can carry
//
// A person row is emitted only when it has a name AND its (campus, district slug)
// pair resolves to a known campus. Skipped rows consume no id.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CampusIndex, RowOutcome, SkipCounts, SkipReason};
use crate::temporal::{normalize_last_updated, Clock};
use crate::workbook::{Row, SheetLayout};

pub const PEOPLE_SHEET: &str = "People";

/// Columns: person id (unused), full name, role, region, district,
/// district slug, campus, status, need type, need amount, note text, last updated
pub const PEOPLE_COLUMNS: usize = 12;

const COL_FULL_NAME: usize = 1;
const COL_ROLE: usize = 2;
const COL_DISTRICT_SLUG: usize = 5;
const COL_CAMPUS: usize = 6;
const COL_STATUS: usize = 7;
const COL_NEED_TYPE: usize = 8;
const COL_NEED_AMOUNT: usize = 9;
const COL_NOTE_TEXT: usize = 10;
const COL_LAST_UPDATED: usize = 11;

pub const PEOPLE_LAYOUT: SheetLayout =
    SheetLayout::new(PEOPLE_SHEET, PEOPLE_COLUMNS).with_timestamps(&[COL_LAST_UPDATED]);

pub const DEFAULT_STATUS: &str = "Not invited yet";

/// The only need type that carries an amount
pub const FINANCIAL_NEED: &str = "Financial";

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub campus_id: i64,
    pub district_id: String,
    pub status: String,
    pub role: Option<String>,
    /// "YYYY-MM-DD HH:MM:SS"
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Need {
    pub id: u64,
    pub person_id: u64,
    #[serde(rename = "type")]
    pub need_type: String,
    pub notes: Option<String>,
    pub is_active: bool,
    /// Cents; financial needs only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: u64,
    pub person_id: u64,
    pub text: String,
    pub is_leader_only: bool,
}

/// Everything one accepted person row produces
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRecords {
    pub person: Person,
    pub need: Option<Need>,
    pub note: Option<Note>,
}

// ============================================================================
// ID COUNTERS
// ============================================================================

/// Next id for each sequential collection. Ids start at 1 and only advance
/// when a record is actually emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdCounters {
    pub next_person: u64,
    pub next_need: u64,
    pub next_note: u64,
}

impl Default for IdCounters {
    fn default() -> Self {
        IdCounters {
            next_person: 1,
            next_need: 1,
            next_note: 1,
        }
    }
}

impl IdCounters {
    pub fn new() -> Self {
        IdCounters::default()
    }

    fn take_person(&mut self) -> u64 {
        let id = self.next_person;
        self.next_person += 1;
        id
    }

    fn take_need(&mut self) -> u64 {
        let id = self.next_need;
        self.next_need += 1;
        id
    }

    fn take_note(&mut self) -> u64 {
        let id = self.next_note;
        self.next_note += 1;
        id
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Dollars to cents by float multiply and truncating cast (12.5 → 1250, 0.29 → 28)
pub fn amount_to_cents(amount: f64) -> i64 {
    (amount * 100.0) as i64
}

/// Turn one person row into records, or say why not.
///
/// Region and district name columns are carried by the sheet but play no
/// part in matching; only campus name and district slug do.
pub fn extract_person_row(
    row: &Row,
    campuses: &CampusIndex,
    clock: &dyn Clock,
    ids: &mut IdCounters,
) -> RowOutcome<PersonRecords> {
    let name = match row.cell(COL_FULL_NAME).present_text() {
        Some(name) => name,
        None => return RowOutcome::Skipped(SkipReason::EmptyName),
    };

    let campus_name = row.cell(COL_CAMPUS).as_text().unwrap_or_default();
    let district_slug = row.cell(COL_DISTRICT_SLUG).as_text().unwrap_or_default();
    // A matched campus with id 0 is falsy, so it counts as no match
    let campus_id = match campuses.resolve(&campus_name, &district_slug) {
        Some(id) if id != 0 => id,
        _ => return RowOutcome::Skipped(SkipReason::UnmatchedCampus),
    };

    let status = row.cell(COL_STATUS);
    let role = row.cell(COL_ROLE);

    let person = Person {
        id: ids.take_person(),
        name,
        campus_id,
        district_id: district_slug,
        status: status
            .present_text()
            .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        role: role.present_text(),
        last_updated: normalize_last_updated(row.cell(COL_LAST_UPDATED), clock),
    };

    let need = row.cell(COL_NEED_TYPE).present_text().map(|need_type| {
        let amount = if need_type == FINANCIAL_NEED {
            financial_amount(row)
        } else {
            None
        };

        Need {
            id: ids.take_need(),
            person_id: person.id,
            need_type,
            notes: None,
            is_active: true,
            amount,
        }
    });

    let note = row.cell(COL_NOTE_TEXT).present_text().map(|text| Note {
        id: ids.take_note(),
        person_id: person.id,
        text,
        is_leader_only: false,
    });

    RowOutcome::Emitted(PersonRecords { person, need, note })
}

fn financial_amount(row: &Row) -> Option<i64> {
    let cell = row.cell(COL_NEED_AMOUNT);
    if !cell.is_present() {
        return None;
    }

    match cell.as_f64() {
        Some(amount) => Some(amount_to_cents(amount)),
        None => {
            warn!(
                sheet = PEOPLE_SHEET,
                row = row.number,
                value = ?cell,
                "need amount is not a number, emitting need without amount"
            );
            None
        }
    }
}

/// The three collections built from the people sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeopleExtraction {
    pub people: Vec<Person>,
    pub needs: Vec<Need>,
    pub notes: Vec<Note>,
    /// Counter state after the last row
    pub ids: IdCounters,
}

pub fn extract_people(
    rows: &[Row],
    campuses: &CampusIndex,
    clock: &dyn Clock,
    skips: &mut SkipCounts,
) -> PeopleExtraction {
    let mut out = PeopleExtraction::default();

    for row in rows {
        match extract_person_row(row, campuses, clock, &mut out.ids) {
            RowOutcome::Emitted(records) => {
                out.people.push(records.person);
                out.needs.extend(records.need);
                out.notes.extend(records.note);
            }
            RowOutcome::Skipped(reason) => {
                debug!(sheet = PEOPLE_SHEET, row = row.number, %reason, "skipping row");
                skips.record(reason);
            }
        }
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
