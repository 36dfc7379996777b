use std::collections::BTreeSet;
use std::fmt;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One dated row of a time series. Values are kept as the text that was read,
/// numeric or not, so a load/save cycle never reformats a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub date: NaiveDate,
    pub values: Vec<String>,
}

/// A table indexed by date. Rows keep insertion order; nothing here enforces
/// unique or sorted keys, callers decide when to sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesTable {
    pub index_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl TimeSeriesTable {
    pub fn new(index_name: impl Into<String>, columns: Vec<String>) -> Self {
        TimeSeriesTable {
            index_name: index_name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, date: NaiveDate, values: Vec<String>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(anyhow!(
                "Row for {} has {} values, table has {} columns",
                date,
                values.len(),
                self.columns.len()
            ));
        }
        self.rows.push(Row { date, values });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn key_set(&self) -> BTreeSet<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Index value of the first row (positional, not the minimum).
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    /// Index value of the last row (positional, not the maximum).
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    pub fn column_position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// First value stored under `column` for `date`.
    pub fn value(&self, date: NaiveDate, column: &str) -> Option<&str> {
        let pos = self.column_position(column)?;
        self.rows
            .iter()
            .find(|r| r.date == date)
            .and_then(|r| r.values.get(pos))
            .map(String::as_str)
    }

    /// Stable sort by date; rows sharing a date keep their relative order.
    pub fn sort_by_date(&mut self) {
        self.rows.sort_by_key(|r| r.date);
    }

    /// Rows for which `keep` returns true, same schema.
    pub fn filter_rows<F>(&self, mut keep: F) -> TimeSeriesTable
    where
        F: FnMut(&Row) -> bool,
    {
        TimeSeriesTable {
            index_name: self.index_name.clone(),
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Appends `other` below `self`, aligning columns by name. Columns only
    /// `other` has are added at the end; missing cells become empty strings.
    pub fn concat(&self, other: &TimeSeriesTable) -> TimeSeriesTable {
        let mut columns = self.columns.clone();
        for col in &other.columns {
            if !columns.contains(col) {
                columns.push(col.clone());
            }
        }

        let mut out = TimeSeriesTable::new(self.index_name.clone(), columns);
        for table in [self, other] {
            let mapping: Vec<Option<usize>> = out
                .columns
                .iter()
                .map(|c| table.column_position(c))
                .collect();
            for row in &table.rows {
                let values = mapping
                    .iter()
                    .map(|pos| pos.and_then(|p| row.values.get(p).cloned()).unwrap_or_default())
                    .collect();
                out.rows.push(Row { date: row.date, values });
            }
        }
        out
    }
}

/// Minute-precision save time embedded in file names as `YYYYMMDDHHMM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SaveStamp(NaiveDateTime);

impl SaveStamp {
    pub const WIDTH: usize = 12;
    const FORMAT: &'static str = "%Y%m%d%H%M";

    pub fn new(at: NaiveDateTime) -> Self {
        // Seconds never reach the file name, drop them so equality matches the encoding.
        let at = at.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(at);
        SaveStamp(at)
    }

    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    pub fn parse_compact(s: &str) -> Result<Self> {
        if s.len() != Self::WIDTH || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(anyhow!("Invalid save stamp '{}': expected 12 digits YYYYMMDDHHMM", s));
        }
        let at = NaiveDateTime::parse_from_str(s, Self::FORMAT)
            .map_err(|e| anyhow!("Invalid save stamp '{}': {}", s, e))?;
        Ok(SaveStamp(at))
    }

    pub fn compact(&self) -> String {
        self.0.format(Self::FORMAT).to_string()
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for SaveStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.compact())
    }
}
