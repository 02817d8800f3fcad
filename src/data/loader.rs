use std::fs;
use std::path::Path;

use crate::error::{csv_io, DataError, Result};

use super::model::{Row, Schema, Series};

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Load a series file: header row with column names, one data row per date.
///
/// The whole file is read into memory. A single malformed row aborts the
/// load with [`DataError::MalformedRow`] rather than being skipped, so a
/// corrupt file can never produce a silently truncated series.
pub fn read_series(path: &Path) -> Result<Series> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| DataError::UnreadableInput {
        path: path.to_path_buf(),
        source: csv_io(e),
    })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::UnreadableInput {
            path: path.to_path_buf(),
            source: csv_io(e),
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let schema = Schema::detect(&headers).map_err(|reason| DataError::MalformedRow {
        path: path.to_path_buf(),
        row: 0,
        reason,
    })?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row_no = i + 1;
        let record = result.map_err(|e| DataError::MalformedRow {
            path: path.to_path_buf(),
            row: row_no,
            reason: e.to_string(),
        })?;
        let fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();
        let row = Row::parse(&schema, fields).map_err(|reason| DataError::MalformedRow {
            path: path.to_path_buf(),
            row: row_no,
            reason,
        })?;
        rows.push(row);
    }

    Ok(Series { schema, rows })
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write a header plus data rows as CSV, atomically.
///
/// The file is written to `<path>.tmp` and renamed into place, so readers
/// never observe a half-written file; an existing file at `path` is
/// replaced. All failures map to [`DataError::WriteError`].
pub fn write_csv<'a, R>(path: &Path, columns: &[String], rows: R) -> Result<()>
where
    R: IntoIterator<Item = &'a [String]>,
{
    let tmp = tmp_path(path);
    let write_err = |source| DataError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(&tmp).map_err(|e| write_err(csv_io(e)))?;
    writer
        .write_record(columns)
        .map_err(|e| write_err(csv_io(e)))?;
    for fields in rows {
        writer.write_record(fields).map_err(|e| write_err(csv_io(e)))?;
    }
    writer.flush().map_err(write_err)?;
    drop(writer);

    fs::rename(&tmp, path).map_err(write_err)
}

/// Sibling temp path used for atomic replacement.
fn tmp_path(path: &Path) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    std::path::PathBuf::from(name)
}
