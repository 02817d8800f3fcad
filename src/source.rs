//! Where a dataset physically lives, and how a date maps to a file.
//!
//! `Source` is a closed three-way variant: one raw file, a directory
//! partitioned by calendar year, or a directory partitioned by ISO week.
//! For the directory layouts the filename alone encodes the partition key,
//! so resolving a query date never requires reading file contents, and an
//! exact-match query touches at most one file regardless of dataset size.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{DataError, Result};
use crate::partition::PartitionKey;

/// Extension recognized for data files, everywhere files are discovered.
pub const DATA_EXT: &str = "csv";

// ---------------------------------------------------------------------------
// Source – tagged union over the three physical layouts
// ---------------------------------------------------------------------------

/// A place data lives. Stateless; constructed per query from caller paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A single unpartitioned file; every query loads it in full.
    Raw { file: PathBuf },
    /// A directory of `<YYYY>.csv` files.
    ByYear { root: PathBuf },
    /// A directory of `<ISO-YYYY>-W<WW>.csv` files.
    ByWeek { root: PathBuf },
}

impl Source {
    /// Source backed by one raw file.
    pub fn raw(file: impl Into<PathBuf>) -> Self {
        Source::Raw { file: file.into() }
    }

    /// Source backed by a per-year directory.
    pub fn by_year(root: impl Into<PathBuf>) -> Self {
        Source::ByYear { root: root.into() }
    }

    /// Source backed by a per-ISO-week directory.
    pub fn by_week(root: impl Into<PathBuf>) -> Self {
        Source::ByWeek { root: root.into() }
    }

    /// Map a target date to the one candidate file that could hold it.
    ///
    /// `None` means "no partition for this date", a valid no-data outcome
    /// rather than an error. For `Raw` the file is always the candidate;
    /// whether it exists is the loader's concern.
    pub fn resolve(&self, date: NaiveDate) -> Option<PathBuf> {
        match self {
            Source::Raw { file } => Some(file.clone()),
            Source::ByYear { root } => existing(partition_path(root, PartitionKey::year_of(date))),
            Source::ByWeek { root } => existing(partition_path(root, PartitionKey::week_of(date))),
        }
    }

    /// Candidate files that could hold the latest value at or before `date`,
    /// newest partition first. Used by the nearest-preceding query; files
    /// whose name does not parse as a partition key are ignored.
    pub(crate) fn candidates_at_or_before(&self, date: NaiveDate) -> Result<Vec<PathBuf>> {
        match self {
            Source::Raw { file } => Ok(vec![file.clone()]),
            Source::ByYear { root } => {
                keyed_candidates(root, PartitionKey::year_of(date), PartitionKey::parse_year_stem)
            }
            Source::ByWeek { root } => {
                keyed_candidates(root, PartitionKey::week_of(date), PartitionKey::parse_week_stem)
            }
        }
    }
}

fn partition_path(root: &Path, key: PartitionKey) -> PathBuf {
    root.join(format!("{}.{DATA_EXT}", key.file_stem()))
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// Partition files under `root` with key <= `target`, newest first.
fn keyed_candidates(
    root: &Path,
    target: PartitionKey,
    parse_stem: fn(&str) -> Option<PartitionKey>,
) -> Result<Vec<PathBuf>> {
    let mut keyed: Vec<(PartitionKey, PathBuf)> = data_files(root)?
        .into_iter()
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?;
            let key = parse_stem(stem)?;
            (key <= target).then_some((key, path))
        })
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(keyed.into_iter().map(|(_, path)| path).collect())
}

// ---------------------------------------------------------------------------
// Directory discovery
// ---------------------------------------------------------------------------

/// All recognized data files directly under `dir`, sorted by name.
///
/// This is the single discovery rule shared by the annotator and the
/// nearest-match query: plain files with the [`DATA_EXT`] extension.
pub fn data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| DataError::UnreadableInput {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DataError::UnreadableInput {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_data = path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(DATA_EXT));
        if is_data {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
