//! Date-partitioned exchange-rate dataset toolkit.
//!
//! A series is a delimited text file with a header row, a `YYYY-MM-DD`
//! date column, and a numeric value column. This crate splits such a
//! series into per-year or per-ISO-week partition files, answers
//! point-in-time queries against any of the three physical layouts (raw
//! file, year directory, week directory), produces JSON structural
//! summaries of files and directories, and separates a raw series into
//! feature/target (X/Y) files.
//!
//! Everything is synchronous, stateless, and path-driven: callers pass a
//! date, a [`Source`], and file paths, and get back values or files.

pub mod annotate;
pub mod data;
pub mod dataset;
pub mod error;
pub mod partition;
pub mod query;
pub mod source;

pub use annotate::{
    annotate_csv, annotate_dir, dir_annotation, file_annotation, Annotation, FileSummary,
};
pub use data::loader::read_series;
pub use data::model::{Row, Schema, Series};
pub use dataset::{build_dataset, save_xy, BuildReport};
pub use error::{DataError, Result};
pub use partition::{split_by_week, split_by_year, PartitionKey};
pub use query::{get_value, get_value_nearest, get_value_with, DuplicatePolicy};
pub use source::Source;
