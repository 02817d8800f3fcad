use chrono::NaiveDate;

use crate::query::DuplicatePolicy;

/// The single fixed date format accepted anywhere in a dataset.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Schema – which header columns carry the date key and the value
// ---------------------------------------------------------------------------

/// Column layout of a series file, detected from its header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// All column names, in file order.
    pub columns: Vec<String>,
    /// Index of the date-key column.
    pub date_idx: usize,
    /// Index of the numeric value (target) column.
    pub value_idx: usize,
}

impl Schema {
    /// Detect the date and value columns from a header row.
    ///
    /// The date column is the one named `date` (case-insensitive), falling
    /// back to the first column; the value column is the one named `value`
    /// (case-insensitive), falling back to the last column.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Result<Self, String> {
        let columns: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        if columns.len() < 2 {
            return Err(format!(
                "expected at least a date and a value column, got {} column(s)",
                columns.len()
            ));
        }
        let date_idx = columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case("date"))
            .unwrap_or(0);
        let value_idx = columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case("value"))
            .unwrap_or(columns.len() - 1);
        if date_idx == value_idx {
            return Err(format!(
                "date and value resolve to the same column '{}'",
                columns[date_idx]
            ));
        }
        Ok(Schema {
            columns,
            date_idx,
            value_idx,
        })
    }

    /// Name of the date-key column.
    pub fn date_column(&self) -> &str {
        &self.columns[self.date_idx]
    }

    /// Name of the value column.
    pub fn value_column(&self) -> &str {
        &self.columns[self.value_idx]
    }
}

// ---------------------------------------------------------------------------
// Row – one (date, value) record
// ---------------------------------------------------------------------------

/// A single dated observation (one record of the source file).
///
/// `fields` keeps the record verbatim in header order, so formatting a
/// parsed row reproduces the original record exactly. `date` and `value`
/// are the parsed views of the key columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub date: NaiveDate,
    pub value: f64,
    /// Verbatim record fields, one per schema column.
    pub fields: Vec<String>,
}

impl Row {
    /// Parse one record against a schema.
    ///
    /// Fails when the field count does not match the header, the date field
    /// is not `YYYY-MM-DD`, or the value field is not a finite number. The
    /// returned reason string carries no file context; the loader adds it.
    pub fn parse(schema: &Schema, fields: Vec<String>) -> Result<Self, String> {
        if fields.len() != schema.columns.len() {
            return Err(format!(
                "expected {} fields, got {}",
                schema.columns.len(),
                fields.len()
            ));
        }

        let raw_date = fields[schema.date_idx].trim();
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
            .map_err(|_| format!("'{raw_date}' is not a YYYY-MM-DD date"))?;

        let raw_value = fields[schema.value_idx].trim();
        let value: f64 = raw_value
            .parse()
            .map_err(|_| format!("'{raw_value}' is not a number"))?;
        if !value.is_finite() {
            return Err(format!("'{raw_value}' is not finite"));
        }

        Ok(Row {
            date,
            value,
            fields,
        })
    }

    /// The formatting side of the round-trip law: the exact fields to write
    /// back out for this row.
    pub fn to_fields(&self) -> &[String] {
        &self.fields
    }
}

// ---------------------------------------------------------------------------
// Series – the complete loaded file
// ---------------------------------------------------------------------------

/// A fully parsed series file: its schema plus all rows in file order.
///
/// Rows are kept in the order they appear on disk; lookups behave as if the
/// series were date-indexed without re-sorting it.
#[derive(Debug, Clone)]
pub struct Series {
    pub schema: Schema,
    pub rows: Vec<Row>,
}

impl Series {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the series has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest date in the series, if any.
    pub fn date_min(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.date).min()
    }

    /// Latest date in the series, if any.
    pub fn date_max(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.date).max()
    }

    /// Exact-match lookup. Duplicate dates are resolved by `policy`.
    pub fn value_on(&self, date: NaiveDate, policy: DuplicatePolicy) -> Option<(NaiveDate, f64)> {
        let hit = match policy {
            DuplicatePolicy::FirstWins => self.rows.iter().find(|r| r.date == date),
            DuplicatePolicy::LastWins => self.rows.iter().rev().find(|r| r.date == date),
        };
        hit.map(|r| (r.date, r.value))
    }

    /// Latest row with `date <= target`, if any. Among rows sharing that
    /// date, `policy` picks the occurrence.
    pub fn latest_at_or_before(
        &self,
        target: NaiveDate,
        policy: DuplicatePolicy,
    ) -> Option<(NaiveDate, f64)> {
        let mut best: Option<&Row> = None;
        for row in &self.rows {
            if row.date > target {
                continue;
            }
            let better = match best {
                None => true,
                Some(b) => {
                    row.date > b.date
                        || (row.date == b.date && policy == DuplicatePolicy::LastWins)
                }
            };
            if better {
                best = Some(row);
            }
        }
        best.map(|r| (r.date, r.value))
    }
}
