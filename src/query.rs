//! Point-in-time queries against a [`Source`].
//!
//! The default contract is exact match: a date with no row yields
//! `Ok(None)`, never a stand-in value. The nearest-preceding policy exists
//! only as the separately named [`get_value_nearest`] so callers can never
//! change query semantics by accident.

use chrono::NaiveDate;
use log::debug;

use crate::data::loader::read_series;
use crate::error::Result;
use crate::source::Source;

// ---------------------------------------------------------------------------
// DuplicatePolicy – duplicate dates within one file
// ---------------------------------------------------------------------------

/// Which occurrence wins when one file carries the same date twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The first occurrence in file order (the default).
    #[default]
    FirstWins,
    /// The last occurrence in file order.
    LastWins,
}

// ---------------------------------------------------------------------------
// Exact-match queries
// ---------------------------------------------------------------------------

/// Value recorded exactly on `date`, or `None` when the dataset has no row
/// for it. Duplicate dates resolve first-wins.
pub fn get_value(date: NaiveDate, source: &Source) -> Result<Option<(NaiveDate, f64)>> {
    get_value_with(date, source, DuplicatePolicy::default())
}

/// [`get_value`] with an explicit duplicate policy.
///
/// Resolves the one candidate file for `date`, loads it, and scans for an
/// exact date match. A missing partition is `Ok(None)`; a malformed row in
/// a resolved file aborts the query instead of being skipped.
pub fn get_value_with(
    date: NaiveDate,
    source: &Source,
    policy: DuplicatePolicy,
) -> Result<Option<(NaiveDate, f64)>> {
    let Some(path) = source.resolve(date) else {
        debug!("no partition for {date}");
        return Ok(None);
    };
    let series = read_series(&path)?;
    Ok(series.value_on(date, policy))
}

// ---------------------------------------------------------------------------
// Nearest-preceding query (explicitly named, never implicit)
// ---------------------------------------------------------------------------

/// Latest value at or before `date`, or `None` when nothing precedes it.
///
/// For partitioned sources this walks candidate partitions newest-first, so
/// a date falling in a gap at the start of a partition still finds the
/// latest value in an earlier one. Useful for series with non-trading-day
/// gaps; exact-match [`get_value`] remains the default contract.
pub fn get_value_nearest(
    date: NaiveDate,
    source: &Source,
    policy: DuplicatePolicy,
) -> Result<Option<(NaiveDate, f64)>> {
    for path in source.candidates_at_or_before(date)? {
        let series = read_series(&path)?;
        if let Some(hit) = series.latest_at_or_before(date, policy) {
            return Ok(Some(hit));
        }
        debug!("{} holds nothing at or before {date}", path.display());
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::partition::{split_by_week, split_by_year};
    use std::fs;
    use std::io::Write as _;
    use std::path::{Path, PathBuf};

    const INPUT: &str = "date,value\n\
                         2023-01-01,10.0\n\
                         2023-06-15,12.5\n\
                         2024-02-20,9.0\n";

    fn write_input(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("rates.csv");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn raw_exact_match_and_miss() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), INPUT);
        let src = Source::raw(&input);

        assert_eq!(
            get_value(date(2023, 6, 15), &src).unwrap(),
            Some((date(2023, 6, 15), 12.5))
        );
        // Gap date under exact-match policy.
        assert_eq!(get_value(date(2023, 6, 16), &src).unwrap(), None);
    }

    #[test]
    fn missing_raw_file_is_an_error_not_none() {
        let dir = tempfile::tempdir().unwrap();
        let src = Source::raw(dir.path().join("absent.csv"));
        let err = get_value(date(2023, 6, 15), &src).unwrap_err();
        assert!(matches!(err, DataError::UnreadableInput { .. }));
    }

    #[test]
    fn partitioned_queries_agree_with_raw() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), INPUT);
        let by_year = dir.path().join("by_year");
        let by_week = dir.path().join("by_week");
        split_by_year(&input, &by_year).unwrap();
        split_by_week(&input, &by_week).unwrap();

        let raw = Source::raw(&input);
        let year = Source::by_year(&by_year);
        let week = Source::by_week(&by_week);

        for d in [date(2023, 1, 1), date(2023, 6, 15), date(2024, 2, 20), date(2023, 6, 16)] {
            let expected = get_value(d, &raw).unwrap();
            assert_eq!(get_value(d, &year).unwrap(), expected, "year layout at {d}");
            assert_eq!(get_value(d, &week).unwrap(), expected, "week layout at {d}");
        }
    }

    #[test]
    fn missing_partition_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), INPUT);
        let by_year = dir.path().join("by_year");
        split_by_year(&input, &by_year).unwrap();

        let src = Source::by_year(&by_year);
        assert_eq!(get_value(date(2025, 1, 1), &src).unwrap(), None);
    }

    #[test]
    fn duplicate_dates_honor_the_policy() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "date,value\n2023-01-01,10.0\n2023-01-01,20.0\n",
        );
        let src = Source::raw(&input);
        let d = date(2023, 1, 1);

        assert_eq!(get_value(d, &src).unwrap(), Some((d, 10.0)));
        assert_eq!(
            get_value_with(d, &src, DuplicatePolicy::LastWins).unwrap(),
            Some((d, 20.0))
        );
    }

    #[test]
    fn malformed_row_aborts_the_query() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "date,value\n2023-01-01,bad\n");
        let src = Source::raw(&input);
        let err = get_value(date(2023, 1, 1), &src).unwrap_err();
        assert!(matches!(err, DataError::MalformedRow { .. }));
    }

    #[test]
    fn nearest_falls_back_within_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), INPUT);
        let src = Source::raw(&input);

        assert_eq!(
            get_value_nearest(date(2023, 6, 16), &src, DuplicatePolicy::default()).unwrap(),
            Some((date(2023, 6, 15), 12.5))
        );
        assert_eq!(
            get_value_nearest(date(2022, 12, 31), &src, DuplicatePolicy::default()).unwrap(),
            None
        );
    }

    #[test]
    fn nearest_walks_back_across_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), INPUT);
        let by_year = dir.path().join("by_year");
        split_by_year(&input, &by_year).unwrap();
        let src = Source::by_year(&by_year);

        // 2024-01-15 precedes every 2024 row; the answer lives in 2023.csv.
        assert_eq!(
            get_value_nearest(date(2024, 1, 15), &src, DuplicatePolicy::default()).unwrap(),
            Some((date(2023, 6, 15), 12.5))
        );
        // 2025 has no partition at all; still answered from 2024.csv.
        assert_eq!(
            get_value_nearest(date(2025, 7, 1), &src, DuplicatePolicy::default()).unwrap(),
            Some((date(2024, 2, 20), 9.0))
        );
    }
}
