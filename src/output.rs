// 💾 Seed Output - one pretty-printed JSON array per collection

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::pipeline::SeedData;

pub const DISTRICTS_FILE: &str = "seed-districts.json";
pub const CAMPUSES_FILE: &str = "seed-campuses.json";
pub const PEOPLE_FILE: &str = "seed-people.json";
pub const NEEDS_FILE: &str = "seed-needs.json";
pub const NOTES_FILE: &str = "seed-notes.json";

/// Where each collection landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFiles {
    pub districts: PathBuf,
    pub campuses: PathBuf,
    pub people: PathBuf,
    pub needs: PathBuf,
    pub notes: PathBuf,
}

impl SeedFiles {
    pub fn in_dir(dir: &Path) -> Self {
        SeedFiles {
            districts: dir.join(DISTRICTS_FILE),
            campuses: dir.join(CAMPUSES_FILE),
            people: dir.join(PEOPLE_FILE),
            needs: dir.join(NEEDS_FILE),
            notes: dir.join(NOTES_FILE),
        }
    }
}

/// Write all five files into `dir`, replacing whatever is there
pub fn write_seed_files(dir: &Path, data: &SeedData) -> Result<SeedFiles> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let files = SeedFiles::in_dir(dir);
    write_json_array(&files.districts, &data.districts)?;
    write_json_array(&files.campuses, &data.campuses)?;
    write_json_array(&files.people, &data.people)?;
    write_json_array(&files.needs, &data.needs)?;
    write_json_array(&files.notes, &data.notes)?;

    Ok(files)
}

/// 2-space indented JSON array, truncating any existing file
pub fn write_json_array<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, records)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::District;

    fn sample() -> SeedData {
        SeedData {
            districts: vec![District {
                id: "northside".to_string(),
                name: "Northside".to_string(),
                region: "North".to_string(),
            }],
            ..SeedData::default()
        }
    }

    #[test]
    fn test_writes_all_five_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("scripts");

        let files = write_seed_files(&out, &sample()).unwrap();

        assert_eq!(files, SeedFiles::in_dir(&out));
        for path in [&files.districts, &files.campuses, &files.people, &files.needs, &files.notes] {
            assert!(path.is_file(), "{} missing", path.display());
        }
        assert_eq!(fs::read_to_string(&files.notes).unwrap(), "[]");
    }

    #[test]
    fn test_pretty_two_space_indent() {
        let dir = tempfile::tempdir().unwrap();

        let files = write_seed_files(dir.path(), &sample()).unwrap();

        assert_eq!(
            fs::read_to_string(&files.districts).unwrap(),
            "[\n  {\n    \"id\": \"northside\",\n    \"name\": \"Northside\",\n    \"region\": \"North\"\n  }\n]"
        );
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join(DISTRICTS_FILE);
        fs::write(&target, "stale content that is much longer than the new output ...........").unwrap();

        write_seed_files(dir.path(), &SeedData::default()).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "[]");
    }
}
