//! Feature/target splitting and the full dataset build pipeline.

use std::path::{Path, PathBuf};

use log::info;

use crate::annotate::{annotate_csv, annotate_dir};
use crate::data::loader::{read_series, write_csv};
use crate::error::Result;
use crate::partition::{split_by_week, split_by_year};

// ---------------------------------------------------------------------------
// X/Y splitter
// ---------------------------------------------------------------------------

/// Split a raw series into a feature file and a target file.
///
/// `x_out` receives every column except the value column; `y_out` receives
/// the date key plus the value column, so the two files stay row-aligned:
/// both have exactly as many data rows as the input, in the same order.
pub fn save_xy(input: &Path, x_out: &Path, y_out: &Path) -> Result<()> {
    let series = read_series(input)?;
    let schema = &series.schema;

    let x_columns: Vec<String> = schema
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != schema.value_idx)
        .map(|(_, c)| c.clone())
        .collect();
    let y_columns = vec![
        schema.date_column().to_string(),
        schema.value_column().to_string(),
    ];

    let x_rows: Vec<Vec<String>> = series
        .rows
        .iter()
        .map(|row| {
            row.fields
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != schema.value_idx)
                .map(|(_, f)| f.clone())
                .collect()
        })
        .collect();
    let y_rows: Vec<Vec<String>> = series
        .rows
        .iter()
        .map(|row| {
            vec![
                row.fields[schema.date_idx].clone(),
                row.fields[schema.value_idx].clone(),
            ]
        })
        .collect();

    write_csv(x_out, &x_columns, x_rows.iter().map(|r| r.as_slice()))?;
    write_csv(y_out, &y_columns, y_rows.iter().map(|r| r.as_slice()))?;
    info!(
        "split {} rows into {} and {}",
        series.len(),
        x_out.display(),
        y_out.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Full build pipeline
// ---------------------------------------------------------------------------

/// Everything written by one [`build_dataset`] run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub x: PathBuf,
    pub y: PathBuf,
    pub year_files: Vec<PathBuf>,
    pub week_files: Vec<PathBuf>,
    pub annotations: Vec<PathBuf>,
}

/// Build the complete derived dataset under `out_dir`.
///
/// Produces `X.csv`/`Y.csv`, the `by_year/` and `by_week/` partition
/// directories, and JSON annotations for the source file and both
/// directories. Atomicity is per file; a failure reports the step that
/// failed and leaves earlier outputs in place.
pub fn build_dataset(input: &Path, out_dir: &Path) -> Result<BuildReport> {
    let x = out_dir.join("X.csv");
    let y = out_dir.join("Y.csv");
    let by_year = out_dir.join("by_year");
    let by_week = out_dir.join("by_week");

    // save_xy creates no directories on its own.
    std::fs::create_dir_all(out_dir).map_err(|source| crate::error::DataError::WriteError {
        path: out_dir.to_path_buf(),
        source,
    })?;

    save_xy(input, &x, &y)?;
    let year_files = split_by_year(input, &by_year)?;
    let week_files = split_by_week(input, &by_week)?;

    let annotations = vec![
        out_dir.join("annotation_src.json"),
        out_dir.join("annotation_by_year.json"),
        out_dir.join("annotation_by_week.json"),
    ];
    annotate_csv(input, &annotations[0])?;
    annotate_dir(&by_year, &annotations[1])?;
    annotate_dir(&by_week, &annotations[2])?;

    info!(
        "dataset built under {}: {} year file(s), {} week file(s)",
        out_dir.display(),
        year_files.len(),
        week_files.len()
    );
    Ok(BuildReport {
        x,
        y,
        year_files,
        week_files,
        annotations,
    })
}
