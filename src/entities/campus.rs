// 🏫 Campus Entity - identity is the integer id from the sheet
// No uniqueness check: a repeated id yields a repeated record.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::{ExtractError, RowOutcome, SkipCounts, SkipReason};
use crate::workbook::{Row, SheetLayout};

pub const CAMPUS_SHEET: &str = "Campuses";

/// Columns: campus id, campus name, district name, district slug, region
pub const CAMPUS_COLUMNS: usize = 5;

pub const CAMPUS_LAYOUT: SheetLayout = SheetLayout::new(CAMPUS_SHEET, CAMPUS_COLUMNS);

const COL_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_DISTRICT_SLUG: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campus {
    pub id: i64,
    pub name: String,
    /// District slug
    pub district_id: String,
}

pub fn campus_from_row(row: &Row) -> Result<RowOutcome<Campus>, ExtractError> {
    let raw_id = row.cell(COL_ID);
    if !raw_id.is_present() {
        return Ok(RowOutcome::Skipped(SkipReason::EmptyCampusId));
    }

    let id = raw_id.as_i64().ok_or_else(|| ExtractError::InvalidCampusId {
        row: row.number,
        value: raw_id.as_text().unwrap_or_default(),
    })?;

    Ok(RowOutcome::Emitted(Campus {
        id,
        name: row.cell(COL_NAME).as_text().unwrap_or_default(),
        district_id: row.cell(COL_DISTRICT_SLUG).as_text().unwrap_or_default(),
    }))
}

/// Campuses in sheet order. A non-integer id aborts the extraction.
pub fn extract_campuses(rows: &[Row], skips: &mut SkipCounts) -> Result<Vec<Campus>, ExtractError> {
    let mut campuses = Vec::new();

    for row in rows {
        match campus_from_row(row)? {
            RowOutcome::Emitted(campus) => campuses.push(campus),
            RowOutcome::Skipped(reason) => {
                debug!(sheet = CAMPUS_SHEET, row = row.number, %reason, "skipping row");
                skips.record(reason);
            }
        }
    }

    Ok(campuses)
}

// ============================================================================
// CAMPUS INDEX
// ============================================================================

/// Lookup by (campus name, district slug). When several campuses share the
/// pair, the one emitted first keeps the entry.
#[derive(Debug, Clone, Default)]
pub struct CampusIndex {
    by_name_and_district: HashMap<(String, String), i64>,
}

impl CampusIndex {
    pub fn from_campuses(campuses: &[Campus]) -> Self {
        let mut by_name_and_district = HashMap::with_capacity(campuses.len());
        for campus in campuses {
            by_name_and_district
                .entry((campus.name.clone(), campus.district_id.clone()))
                .or_insert(campus.id);
        }
        CampusIndex { by_name_and_district }
    }

    pub fn resolve(&self, name: &str, district_slug: &str) -> Option<i64> {
        self.by_name_and_district
            .get(&(name.to_string(), district_slug.to_string()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.by_name_and_district.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name_and_district.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::CellValue;
    use pretty_assertions::assert_eq;

    fn row(number: usize, id: CellValue, name: &str, slug: &str) -> Row {
        Row::new(
            number,
            vec![
                id,
                CellValue::text(name),
                CellValue::text("District Name"),
                CellValue::text(slug),
                CellValue::text("Region"),
            ],
        )
    }

    fn campus(id: i64, name: &str, slug: &str) -> Campus {
        Campus {
            id,
            name: name.to_string(),
            district_id: slug.to_string(),
        }
    }

    #[test]
    fn test_numeric_and_text_ids() {
        let rows = vec![
            row(2, CellValue::Number(5.0), "Central High", "northside"),
            row(3, CellValue::text("12"), "East High", "eastview"),
        ];
        let mut skips = SkipCounts::new();

        let campuses = extract_campuses(&rows, &mut skips).unwrap();

        assert_eq!(
            campuses,
            vec![campus(5, "Central High", "northside"), campus(12, "East High", "eastview")]
        );
        assert_eq!(skips.total(), 0);
    }

    #[test]
    fn test_empty_or_zero_id_skipped() {
        let rows = vec![
            row(2, CellValue::Empty, "Nameless", "x"),
            row(3, CellValue::Number(0.0), "Zero", "x"),
            row(4, CellValue::Number(9.0), "Kept", "x"),
        ];
        let mut skips = SkipCounts::new();

        let campuses = extract_campuses(&rows, &mut skips).unwrap();

        assert_eq!(campuses, vec![campus(9, "Kept", "x")]);
        assert_eq!(skips.get(SkipReason::EmptyCampusId), 2);
    }

    #[test]
    fn test_duplicate_ids_pass_through() {
        let rows = vec![
            row(2, CellValue::Number(7.0), "A", "d1"),
            row(3, CellValue::Number(7.0), "B", "d2"),
        ];
        let mut skips = SkipCounts::new();

        let campuses = extract_campuses(&rows, &mut skips).unwrap();

        assert_eq!(campuses.len(), 2);
        assert!(campuses.iter().all(|c| c.id == 7));
    }

    #[test]
    fn test_non_integer_id_is_hard_error() {
        let rows = vec![row(4, CellValue::text("abc"), "Broken", "d")];
        let mut skips = SkipCounts::new();

        assert_eq!(
            extract_campuses(&rows, &mut skips),
            Err(ExtractError::InvalidCampusId {
                row: 4,
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_index_first_match_wins() {
        let campuses = vec![
            campus(1, "Central High", "northside"),
            campus(2, "Central High", "northside"),
            campus(3, "Central High", "southgate"),
        ];
        let index = CampusIndex::from_campuses(&campuses);

        assert_eq!(index.resolve("Central High", "northside"), Some(1));
        assert_eq!(index.resolve("Central High", "southgate"), Some(3));
        assert_eq!(index.resolve("Central High", "eastview"), None);
        assert_eq!(index.resolve("central high", "northside"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_serialized_shape() {
        assert_eq!(
            serde_json::to_string(&campus(5, "Central High", "northside")).unwrap(),
            r#"{"id":5,"name":"Central High","districtId":"northside"}"#
        );
    }
}
