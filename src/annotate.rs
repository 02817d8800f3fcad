//! Structural summaries ("annotations") of a series file or directory.
//!
//! An annotation is computed fresh on every call and serialized as pretty
//! JSON. Directory annotations aggregate over every recognized file and
//! carry a per-file breakdown.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::loader::read_series;
use crate::error::{DataError, Result};
use crate::source::{data_files, DATA_EXT};

// ---------------------------------------------------------------------------
// Annotation model
// ---------------------------------------------------------------------------

/// Summary of one file inside a directory annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub row_count: usize,
    /// `None` for a file with a header and no data rows.
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
}

/// Structural summary of a series file or a directory of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub path: String,
    pub row_count: usize,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    /// Column names in file order.
    pub columns: Vec<String>,
    /// Per-file breakdown, present for directory annotations only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_file: Option<BTreeMap<String, FileSummary>>,
}

// ---------------------------------------------------------------------------
// Computing
// ---------------------------------------------------------------------------

/// Annotation of a single series file.
///
/// Any malformed row aborts with [`DataError::MalformedRow`]; excluding bad
/// rows from the counts is not allowed.
pub fn file_annotation(path: &Path) -> Result<Annotation> {
    let series = read_series(path)?;
    Ok(Annotation {
        path: path.display().to_string(),
        row_count: series.len(),
        date_min: series.date_min(),
        date_max: series.date_max(),
        columns: series.schema.columns.clone(),
        per_file: None,
    })
}

/// Aggregated annotation of every recognized file directly under `dir`.
///
/// `row_count` is the sum over files, `date_min`/`date_max` the global
/// extremes, `columns` those of the first file. Fails with
/// [`DataError::EmptyDirectory`] when no data files are present.
pub fn dir_annotation(dir: &Path) -> Result<Annotation> {
    let files = data_files(dir)?;
    if files.is_empty() {
        return Err(DataError::EmptyDirectory {
            dir: dir.to_path_buf(),
            ext: DATA_EXT,
        });
    }

    let mut row_count = 0;
    let mut date_min: Option<NaiveDate> = None;
    let mut date_max: Option<NaiveDate> = None;
    let mut columns: Vec<String> = Vec::new();
    let mut per_file = BTreeMap::new();

    for (i, file) in files.iter().enumerate() {
        let annotation = file_annotation(file)?;
        debug!("{}: {} rows", file.display(), annotation.row_count);
        if i == 0 {
            columns = annotation.columns.clone();
        }
        row_count += annotation.row_count;
        date_min = min_opt(date_min, annotation.date_min);
        date_max = max_opt(date_max, annotation.date_max);

        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        per_file.insert(
            name,
            FileSummary {
                row_count: annotation.row_count,
                date_min: annotation.date_min,
                date_max: annotation.date_max,
            },
        );
    }

    Ok(Annotation {
        path: dir.display().to_string(),
        row_count,
        date_min,
        date_max,
        columns,
        per_file: Some(per_file),
    })
}

fn min_opt(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (x, None) | (None, x) => x,
    }
}

fn max_opt(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (x, None) | (None, x) => x,
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Annotate a single file and write the JSON summary to `dest`.
pub fn annotate_csv(input: &Path, dest: &Path) -> Result<Annotation> {
    let annotation = file_annotation(input)?;
    write_annotation(&annotation, dest)?;
    Ok(annotation)
}

/// Annotate a directory and write the JSON summary to `dest`.
pub fn annotate_dir(dir: &Path, dest: &Path) -> Result<Annotation> {
    let annotation = dir_annotation(dir)?;
    write_annotation(&annotation, dest)?;
    Ok(annotation)
}

/// Serialize to pretty JSON and move into place atomically (tmp + rename).
fn write_annotation(annotation: &Annotation, dest: &Path) -> Result<()> {
    let write_err = |source| DataError::WriteError {
        path: dest.to_path_buf(),
        source,
    };
    let json = serde_json::to_string_pretty(annotation)
        .map_err(|e| write_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    let mut tmp = dest.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, json).map_err(write_err)?;
    fs::rename(&tmp, dest).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn file_annotation_reports_extent_and_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "rates.csv",
            "date,value\n2023-06-15,12.5\n2023-01-01,10.0\n",
        );

        let a = file_annotation(&path).unwrap();
        assert_eq!(a.row_count, 2);
        assert_eq!(a.date_min, Some(date(2023, 1, 1)));
        assert_eq!(a.date_max, Some(date(2023, 6, 15)));
        assert_eq!(a.columns, vec!["date", "value"]);
        assert!(a.per_file.is_none());
    }

    #[test]
    fn header_only_file_has_no_extent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "empty.csv", "date,value\n");
        let a = file_annotation(&path).unwrap();
        assert_eq!(a.row_count, 0);
        assert_eq!(a.date_min, None);
        assert_eq!(a.date_max, None);
    }

    #[test]
    fn malformed_row_aborts_annotation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "bad.csv", "date,value\n2023-01-01,x\n");
        assert!(matches!(
            file_annotation(&path),
            Err(DataError::MalformedRow { .. })
        ));
    }

    #[test]
    fn dir_annotation_aggregates_over_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "2023.csv",
            "date,value\n2023-01-01,10.0\n2023-06-15,12.5\n",
        );
        write_file(dir.path(), "2024.csv", "date,value\n2024-02-20,9.0\n");
        write_file(dir.path(), "notes.txt", "ignored");

        let a = dir_annotation(dir.path()).unwrap();
        assert_eq!(a.row_count, 3);
        assert_eq!(a.date_min, Some(date(2023, 1, 1)));
        assert_eq!(a.date_max, Some(date(2024, 2, 20)));
        assert_eq!(a.columns, vec!["date", "value"]);

        let per_file = a.per_file.unwrap();
        assert_eq!(per_file.len(), 2);
        assert_eq!(per_file["2023.csv"].row_count, 2);
        assert_eq!(per_file["2024.csv"].row_count, 1);
        // The aggregate count is the sum of the per-file counts.
        let sum: usize = per_file.values().map(|f| f.row_count).sum();
        assert_eq!(a.row_count, sum);
    }

    #[test]
    fn empty_directory_is_a_typed_failure() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            dir_annotation(dir.path()),
            Err(DataError::EmptyDirectory { .. })
        ));
    }

    #[test]
    fn annotate_csv_writes_json_that_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "rates.csv", "date,value\n2023-01-01,10.0\n");
        let dest = dir.path().join("annotation_src.json");

        let written = annotate_csv(&input, &dest).unwrap();
        let text = fs::read_to_string(&dest).unwrap();
        let parsed: Annotation = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, written);
        assert_eq!(parsed.date_min, Some(date(2023, 1, 1)));
        // Atomic write leaves no temp file behind.
        assert!(!dir.path().join("annotation_src.json.tmp").exists());
    }

    #[test]
    fn annotate_dir_writes_per_file_breakdown() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("by_year");
        fs::create_dir(&data).unwrap();
        write_file(&data, "2023.csv", "date,value\n2023-01-01,10.0\n");
        let dest = dir.path().join("annotation_by_year.json");

        annotate_dir(&data, &dest).unwrap();
        let parsed: Annotation =
            serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
        assert!(parsed.per_file.unwrap().contains_key("2023.csv"));
    }
}
