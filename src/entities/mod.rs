// Entity Models - districts, campuses, people and what hangs off people
//
// Each entity module owns:
// - The record type, serialized in output field order
// - A per-row function that either emits a record or names why the row was skipped
// - An extractor that folds a whole sheet through that function

pub mod campus;
pub mod district;
pub mod person;

pub use campus::{extract_campuses, Campus, CampusIndex};
pub use district::{extract_districts, District};
pub use person::{extract_people, extract_person_row, IdCounters, Need, Note, PeopleExtraction, Person, PersonRecords};

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// ROW OUTCOME
// ============================================================================

/// Result of looking at one source row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome<T> {
    Emitted(T),
    Skipped(SkipReason),
}

/// Why a row produced nothing. Skips are soft: the run continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// District row without a slug
    EmptySlug,
    /// District slug already emitted by an earlier row
    DuplicateSlug,
    /// Campus row without an id
    EmptyCampusId,
    /// Person row without a name
    EmptyName,
    /// Person row whose (campus, district slug) pair matches no campus
    UnmatchedCampus,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkipReason::EmptySlug => "empty district slug",
            SkipReason::DuplicateSlug => "duplicate district slug",
            SkipReason::EmptyCampusId => "empty campus id",
            SkipReason::EmptyName => "empty person name",
            SkipReason::UnmatchedCampus => "no matching campus",
        };
        f.write_str(label)
    }
}

/// Skipped-row tally, per reason
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkipCounts {
    counts: BTreeMap<SkipReason, usize>,
}

impl SkipCounts {
    pub fn new() -> Self {
        SkipCounts::default()
    }

    pub fn record(&mut self, reason: SkipReason) {
        *self.counts.entry(reason).or_insert(0) += 1;
    }

    pub fn get(&self, reason: SkipReason) -> usize {
        self.counts.get(&reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkipReason, usize)> + '_ {
        self.counts.iter().map(|(reason, count)| (*reason, *count))
    }
}

// ============================================================================
// HARD ERRORS
// ============================================================================

/// Row contents that cannot be skipped past (the run aborts)
#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("campus row {row}: id '{value}' is not an integer")]
    InvalidCampusId { row: usize, value: String },
}
