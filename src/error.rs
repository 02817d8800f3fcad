use std::io;
use std::path::PathBuf;

/// Failure taxonomy for dataset operations.
///
/// "No data for this date" is deliberately *not* an error: queries return
/// `Ok(None)` for that case, and only real failures (unreadable files,
/// corrupt rows, failed writes) surface here.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// A data row whose date or value does not parse. `row` is the 1-based
    /// data-row number; row 0 denotes the header itself.
    #[error("{}: row {row}: {reason}", .path.display())]
    MalformedRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    /// The source file or directory could not be opened or read.
    #[error("cannot read {}", .path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination file could not be created or written.
    #[error("cannot write {}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory operation required at least one recognized data file.
    #[error("no *.{ext} files in {}", .dir.display())]
    EmptyDirectory { dir: PathBuf, ext: &'static str },
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, DataError>;

/// Unwrap a `csv::Error` down to the `io::Error` it carries, or synthesize
/// an `InvalidData` one for purely structural CSV failures.
pub(crate) fn csv_io(err: csv::Error) -> io::Error {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(e) => e,
            _ => io::Error::new(io::ErrorKind::Other, "csv error"),
        }
    } else {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}
