//! Splitting a series into per-year or per-ISO-week files.
//!
//! The key mapping is a pure function of the row's date: a row belongs to
//! exactly one partition per granularity, independent of processing order.
//! Output files reuse the input header and keep rows in their input order
//! (stable partitioning, not a re-sort), so re-running on an unchanged
//! input reproduces the same byte-identical file set.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use log::info;

use crate::data::loader::{read_series, write_csv};
use crate::data::model::Series;
use crate::error::{DataError, Result};
use crate::source::DATA_EXT;

// ---------------------------------------------------------------------------
// PartitionKey – year or ISO year+week of a date
// ---------------------------------------------------------------------------

/// Identity of one partition file.
///
/// `Week` uses the ISO week-based year, which differs from the calendar
/// year around January 1st (2021-01-01 belongs to 2020-W53).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartitionKey {
    Year(i32),
    Week { year: i32, week: u32 },
}

impl PartitionKey {
    /// Calendar-year key of a date.
    pub fn year_of(date: NaiveDate) -> Self {
        PartitionKey::Year(date.year())
    }

    /// ISO year+week key of a date.
    pub fn week_of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        PartitionKey::Week {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// File stem encoding this key: `2023` or `2023-W05`.
    pub fn file_stem(&self) -> String {
        match *self {
            PartitionKey::Year(year) => format!("{year:04}"),
            PartitionKey::Week { year, week } => format!("{year:04}-W{week:02}"),
        }
    }

    /// Parse a file stem back into a year key. `None` for anything that is
    /// not exactly four digits.
    pub fn parse_year_stem(stem: &str) -> Option<Self> {
        if stem.len() != 4 || !stem.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        stem.parse().ok().map(PartitionKey::Year)
    }

    /// Parse a file stem back into a week key (`2023-W05`).
    pub fn parse_week_stem(stem: &str) -> Option<Self> {
        let (year, week) = stem.split_once("-W")?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if week.len() != 2 || !week.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let week: u32 = week.parse().ok()?;
        if !(1..=53).contains(&week) {
            return None;
        }
        Some(PartitionKey::Week {
            year: year.parse().ok()?,
            week,
        })
    }
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Split `input` into one file per calendar year under `out_dir`.
///
/// Returns the written paths in key order. `out_dir` is created if absent;
/// existing files for the same keys are overwritten. Atomicity is per
/// file: a failure mid-run leaves the already-written groups intact and
/// names the file that failed.
pub fn split_by_year(input: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let series = read_series(input)?;
    split_series(&series, out_dir, PartitionKey::year_of)
}

/// Split `input` into one file per ISO week under `out_dir`.
pub fn split_by_week(input: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let series = read_series(input)?;
    split_series(&series, out_dir, PartitionKey::week_of)
}

/// Group rows by `key_of` in input order and write one file per group.
fn split_series(
    series: &Series,
    out_dir: &Path,
    key_of: fn(NaiveDate) -> PartitionKey,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|source| DataError::WriteError {
        path: out_dir.to_path_buf(),
        source,
    })?;

    // BTreeMap keeps groups in key order; pushing preserves row order.
    let mut groups: BTreeMap<PartitionKey, Vec<&[String]>> = BTreeMap::new();
    for row in &series.rows {
        groups.entry(key_of(row.date)).or_default().push(row.to_fields());
    }

    let mut written = Vec::with_capacity(groups.len());
    for (key, rows) in &groups {
        let path = out_dir.join(format!("{}.{DATA_EXT}", key.file_stem()));
        write_csv(&path, &series.schema.columns, rows.iter().copied())?;
        written.push(path);
    }
    info!(
        "partitioned {} rows into {} files under {}",
        series.len(),
        written.len(),
        out_dir.display()
    );
    Ok(written)
}
