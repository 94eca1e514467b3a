pub mod loader;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::fields::LogicalField;
use crate::template::{ColumnMapping, MappedColumn};

pub use loader::DatasetError;

pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
];

/// Source column identifier. Spreadsheet exports may carry numeric headers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColumnId {
    Integer(i64),
    Text(String),
}

impl ColumnId {
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnId::Integer(n) => write!(f, "{n}"),
            ColumnId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ColumnId {
    fn from(value: &str) -> Self {
        ColumnId::Text(value.to_string())
    }
}

/// A raw spreadsheet cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    #[default]
    Empty,
}

impl CellValue {
    /// Classifies raw text. Numbers are only recognised when they print back
    /// to the same text, so codes like `007` stay textual.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                let number = CellValue::Number(n);
                if number.to_string() == trimmed {
                    return number;
                }
            }
        }
        CellValue::Text(raw.to_string())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Best-effort conversion to a calendar date. Values no format accepts
    /// are returned unchanged.
    pub fn normalize_date(self, formats: &[String]) -> Self {
        let CellValue::Text(raw) = &self else {
            return self;
        };
        let trimmed = raw.trim();
        for format in DEFAULT_DATE_FORMATS
            .iter()
            .copied()
            .chain(formats.iter().map(String::as_str))
        {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return CellValue::Date(dt.date());
            }
            if let Ok(d) = NaiveDate::parse_from_str(trimmed, format) {
                return CellValue::Date(d);
            }
        }
        log::debug!("keeping unparsed date value '{trimmed}'");
        self
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Empty => Ok(()),
        }
    }
}

/// Tabular data as read from a file, before any mapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceTable {
    pub columns: Vec<ColumnId>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SourceTable {
    pub fn position(&self, column: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    values: BTreeMap<LogicalField, CellValue>,
}

static EMPTY: CellValue = CellValue::Empty;

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: LogicalField, value: CellValue) -> Self {
        self.values.insert(field, value);
        self
    }

    /// Missing fields read as `Empty`.
    pub fn get(&self, field: LogicalField) -> &CellValue {
        self.values.get(&field).unwrap_or(&EMPTY)
    }

    pub fn set(&mut self, field: LogicalField, value: CellValue) {
        self.values.insert(field, value);
    }
}

/// Key a user-typed date is compared under: the same normalization the
/// scheduled-date column goes through, so `08/03/2024` selects `2024-03-08`.
pub fn date_key(raw: &str, formats: &[String]) -> String {
    CellValue::from_text(raw.trim()).normalize_date(formats).to_string()
}

/// Rows keyed by logical field, ready for rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Renames mapped source columns to their logical fields and normalizes
    /// scheduled dates. Unmapped fields read as `Empty`.
    pub fn from_source(table: &SourceTable, mapping: &ColumnMapping, date_formats: &[String]) -> Self {
        let positions: Vec<(LogicalField, usize)> = LogicalField::ALL
            .into_iter()
            .filter_map(|field| match mapping.get(field) {
                MappedColumn::Column(id) => table.position(id).map(|idx| (field, idx)),
                MappedColumn::None => None,
            })
            .collect();

        let rows = table
            .rows
            .iter()
            .map(|raw| {
                let mut row = Row::new();
                for (field, idx) in positions.iter() {
                    let mut value = raw.get(*idx).cloned().unwrap_or_default();
                    if *field == LogicalField::ScheduledDate {
                        value = value.normalize_date(date_formats);
                    }
                    row.set(*field, value);
                }
                row
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct non-empty scheduled dates, sorted by their text form.
    pub fn available_dates(&self) -> Vec<String> {
        let dates: BTreeSet<String> = self
            .rows
            .iter()
            .map(|r| r.get(LogicalField::ScheduledDate))
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
            .collect();
        dates.into_iter().collect()
    }

    /// Keeps rows whose scheduled date is among `selected`. Rows without a
    /// date never match.
    pub fn filter_dates(self, selected: &[String]) -> Self {
        let wanted: HashSet<&str> = selected.iter().map(|s| s.trim()).collect();
        let rows = self
            .rows
            .into_iter()
            .filter(|r| {
                let date = r.get(LogicalField::ScheduledDate);
                !date.is_empty() && wanted.contains(date.to_string().as_str())
            })
            .collect();
        Self { rows }
    }

    /// Replaces the connection link of every row when `link` is non-blank.
    pub fn override_connection_link(mut self, link: &str) -> Self {
        let link = link.trim();
        if link.is_empty() {
            return self;
        }
        for row in self.rows.iter_mut() {
            row.set(LogicalField::ConnectionLink, CellValue::Text(link.to_string()));
        }
        self
    }
}
