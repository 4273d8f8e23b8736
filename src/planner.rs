//! Destination planning.
//!
//! Pure functions only: nothing here touches the filesystem, so every rule
//! can be tested with hand-built [`FileRecord`]s.
//!
//! ```
//! use chrono::{Local, TimeZone};
//! use ordna::planner::bucket_dir;
//!
//! let t = Local.with_ymd_and_hms(2023, 3, 15, 12, 0, 0).unwrap();
//! assert_eq!(bucket_dir(&t, ".JPG", true), std::path::Path::new("2023/03_March/jpg"));
//! assert_eq!(bucket_dir(&t, "", true), std::path::Path::new("2023/03_March/unknown"));
//! ```

use crate::config::Config;
use crate::types::{Action, FileRecord, PlanEntry};
use chrono::{DateTime, Datelike, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directory segment used when extension grouping is on and a file has none.
pub const UNKNOWN_EXTENSION: &str = "unknown";

/// Bucket directory relative to the destination root:
/// `YYYY/MM_MonthName[/extension]`.
pub fn bucket_dir<Tz: TimeZone>(
    modified: &DateTime<Tz>,
    extension: &str,
    group_by_extension: bool,
) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let mut dir = PathBuf::from(format!("{:04}", modified.year()));
    dir.push(modified.format("%m_%B").to_string());
    if group_by_extension {
        dir.push(extension_segment(extension));
    }
    dir
}

/// Lower-cased extension without its leading dot, or [`UNKNOWN_EXTENSION`].
pub fn extension_segment(extension: &str) -> String {
    let ext = extension.strip_prefix('.').unwrap_or(extension).to_lowercase();
    if ext.is_empty() {
        UNKNOWN_EXTENSION.to_string()
    } else {
        ext
    }
}

/// Plans one entry per record, in record order.
///
/// The destination file name is the source's base name, unchanged.
pub fn plan(config: &Config, records: &[FileRecord]) -> Vec<PlanEntry> {
    let action = Action::from(config.mode);
    records
        .iter()
        .map(|record| {
            let file_name = record
                .source_path
                .file_name()
                .unwrap_or(record.source_path.as_os_str());
            let destination_path = config
                .destination
                .join(bucket_dir(
                    &record.modified,
                    &record.extension,
                    config.group_by_extension,
                ))
                .join(file_name);
            PlanEntry {
                source_path: record.source_path.clone(),
                destination_path,
                action,
            }
        })
        .collect()
}

/// Two or more sources planned onto the same destination path.
///
/// Application resolves these last-one-wins: entries are applied in plan
/// order, so the final source listed overwrites the earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub destination_path: PathBuf,
    /// Sources in plan order; the last one is what remains after a live run.
    pub sources: Vec<PathBuf>,
}

impl Collision {
    pub fn winner(&self) -> Option<&Path> {
        self.sources.last().map(PathBuf::as_path)
    }
}

/// Every destination targeted by more than one entry, sorted by destination.
pub fn find_collisions(plan: &[PlanEntry]) -> Vec<Collision> {
    let mut by_destination: BTreeMap<&Path, Vec<PathBuf>> = BTreeMap::new();
    for entry in plan {
        by_destination
            .entry(entry.destination_path.as_path())
            .or_default()
            .push(entry.source_path.clone());
    }

    by_destination
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(destination, sources)| Collision {
            destination_path: destination.to_path_buf(),
            sources,
        })
        .collect()
}

/// Bucket label (`2023/03_March[/jpg]`) of a planned destination, used for summaries.
pub fn bucket_label(destination_root: &Path, entry: &PlanEntry) -> String {
    entry
        .destination_path
        .strip_prefix(destination_root)
        .ok()
        .and_then(Path::parent)
        .map(|bucket| bucket.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransferMode;
    use chrono::Local;

    fn record(path: &str, y: i32, m: u32, d: u32, extension: &str) -> FileRecord {
        FileRecord {
            source_path: PathBuf::from(path),
            relative_path: PathBuf::from(Path::new(path).file_name().unwrap()),
            size: 1,
            modified: Local
                .with_ymd_and_hms(y, m, d, 12, 0, 0)
                .earliest()
                .expect("valid local time"),
            extension: extension.to_string(),
            digest: None,
        }
    }

    fn config(mode: TransferMode) -> Config {
        Config::new(mode, vec![PathBuf::from("src")], PathBuf::from("dest")).unwrap()
    }

    #[test]
    fn test_every_month_gets_zero_padded_english_name() {
        let expected = [
            "01_January",
            "02_February",
            "03_March",
            "04_April",
            "05_May",
            "06_June",
            "07_July",
            "08_August",
            "09_September",
            "10_October",
            "11_November",
            "12_December",
        ];
        for (index, name) in expected.iter().enumerate() {
            let t = Local
                .with_ymd_and_hms(2024, index as u32 + 1, 10, 12, 0, 0)
                .earliest()
                .unwrap();
            assert_eq!(bucket_dir(&t, ".txt", false), Path::new("2024").join(name));
        }
    }

    #[test]
    fn test_year_is_four_digits() {
        let t = Local.with_ymd_and_hms(999, 7, 1, 12, 0, 0).earliest().unwrap();
        assert_eq!(bucket_dir(&t, "", false), Path::new("0999/07_July"));
    }

    #[test]
    fn test_extension_segment() {
        assert_eq!(extension_segment(".JPG"), "jpg");
        assert_eq!(extension_segment("png"), "png");
        assert_eq!(extension_segment(""), "unknown");
        assert_eq!(extension_segment("."), "unknown");
    }

    #[test]
    fn test_plan_without_extension_grouping() {
        let records = vec![record("src/photo.jpg", 2023, 3, 15, ".jpg")];
        let plan = plan(&config(TransferMode::Copy), &records);

        assert_eq!(
            plan,
            vec![PlanEntry {
                source_path: PathBuf::from("src/photo.jpg"),
                destination_path: PathBuf::from("dest/2023/03_March/photo.jpg"),
                action: Action::Copy,
            }]
        );
    }

    #[test]
    fn test_plan_with_extension_grouping() {
        let records = vec![
            record("src/a/IMG_1.JPG", 2023, 3, 15, ".jpg"),
            record("src/Makefile", 2021, 11, 2, ""),
        ];
        let config = config(TransferMode::Move).group_by_extension(true);
        let plan = plan(&config, &records);

        assert_eq!(
            plan[0].destination_path,
            PathBuf::from("dest/2023/03_March/jpg/IMG_1.JPG")
        );
        assert_eq!(
            plan[1].destination_path,
            PathBuf::from("dest/2021/11_November/unknown/Makefile")
        );
        assert!(plan.iter().all(|entry| entry.action == Action::Move));
    }

    #[test]
    fn test_plan_preserves_record_order() {
        let records = vec![
            record("src/z.txt", 2020, 1, 1, ".txt"),
            record("src/a.txt", 2019, 1, 1, ".txt"),
            record("src/m.txt", 2021, 1, 1, ".txt"),
        ];
        let sources: Vec<_> = plan(&config(TransferMode::Copy), &records)
            .into_iter()
            .map(|e| e.source_path)
            .collect();
        assert_eq!(
            sources,
            vec![
                PathBuf::from("src/z.txt"),
                PathBuf::from("src/a.txt"),
                PathBuf::from("src/m.txt")
            ]
        );
    }

    #[test]
    fn test_destinations_stay_under_destination_root() {
        let records = vec![
            record("/abs/path/x.txt", 2023, 1, 1, ".txt"),
            record("rel/y", 2023, 1, 1, ""),
        ];
        let config = config(TransferMode::Copy).group_by_extension(true);
        for entry in plan(&config, &records) {
            assert!(entry.destination_path.starts_with("dest"));
        }
    }

    #[test]
    fn test_find_collisions_same_name_same_bucket() {
        let records = vec![
            record("src/one/photo.jpg", 2023, 3, 1, ".jpg"),
            record("src/unique.jpg", 2023, 3, 1, ".jpg"),
            record("src/two/photo.jpg", 2023, 3, 20, ".jpg"),
            record("src/three/photo.jpg", 2023, 4, 1, ".jpg"),
        ];
        let plan = plan(&config(TransferMode::Move), &records);
        let collisions = find_collisions(&plan);

        assert_eq!(collisions.len(), 1);
        assert_eq!(
            collisions[0].destination_path,
            PathBuf::from("dest/2023/03_March/photo.jpg")
        );
        assert_eq!(
            collisions[0].sources,
            vec![
                PathBuf::from("src/one/photo.jpg"),
                PathBuf::from("src/two/photo.jpg")
            ]
        );
        assert_eq!(
            collisions[0].winner(),
            Some(Path::new("src/two/photo.jpg"))
        );
    }

    #[test]
    fn test_no_collisions_for_distinct_destinations() {
        let records = vec![
            record("src/a.jpg", 2023, 3, 1, ".jpg"),
            record("src/a.png", 2023, 3, 1, ".png"),
        ];
        let plan = plan(&config(TransferMode::Copy), &records);
        assert!(find_collisions(&plan).is_empty());
    }

    #[test]
    fn test_bucket_label() {
        let records = vec![record("src/a.jpg", 2023, 3, 1, ".jpg")];
        let config = config(TransferMode::Copy).group_by_extension(true);
        let plan = plan(&config, &records);
        assert_eq!(bucket_label(Path::new("dest"), &plan[0]), "2023/03_March/jpg");
    }
}
