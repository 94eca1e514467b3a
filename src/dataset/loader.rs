use std::io::Read;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use super::{CellValue, ColumnId, SourceTable};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported JSON table: {message}")]
    JsonShape { message: String },

    #[error("unsupported dataset format for {path} (expected .csv, .tsv or .json)")]
    UnsupportedFormat { path: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Tsv,
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl SourceTable {
    /// Reads a CSV/TSV or JSON table, picking the reader by file extension.
    pub fn from_path(path: &Path, delimiter: Option<u8>) -> Result<Self, DatasetError> {
        let format = SourceFormat::from_path(path).ok_or_else(|| DatasetError::UnsupportedFormat {
            path: path.display().to_string(),
        })?;
        let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let table = match format {
            SourceFormat::Csv => read_csv(file, delimiter.unwrap_or(b','))?,
            SourceFormat::Tsv => read_csv(file, delimiter.unwrap_or(b'\t'))?,
            SourceFormat::Json => {
                let mut raw = String::new();
                let mut file = file;
                file.read_to_string(&mut raw).map_err(|e| DatasetError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?;
                read_json(&raw)?
            }
        };
        log::info!(
            "loaded {} rows x {} columns from {}",
            table.rows.len(),
            table.columns.len(),
            path.display()
        );
        Ok(table)
    }
}

/// First record is the header. Short records are padded with empty cells.
pub fn read_csv<R: Read>(reader: R, delimiter: u8) -> Result<SourceTable, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<ColumnId> = rdr
        .headers()?
        .iter()
        .map(|h| ColumnId::Text(h.to_string()))
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut row: Vec<CellValue> = record.iter().map(CellValue::from_text).collect();
        if row.len() < columns.len() {
            row.resize(columns.len(), CellValue::Empty);
        }
        rows.push(row);
    }
    Ok(SourceTable { columns, rows })
}

/// Accepts `{"columns": [...], "rows": [[...]]}` or an array of objects.
pub fn read_json(raw: &str) -> Result<SourceTable, DatasetError> {
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Object(mut obj) => {
            let columns = match obj.remove("columns") {
                Some(Value::Array(cols)) => cols.iter().map(column_id_from_json).collect::<Vec<_>>(),
                _ => {
                    return Err(DatasetError::JsonShape {
                        message: "missing \"columns\" array".to_string(),
                    })
                }
            };
            let rows = match obj.remove("rows") {
                Some(Value::Array(rows)) => rows,
                None => Vec::new(),
                Some(_) => {
                    return Err(DatasetError::JsonShape {
                        message: "\"rows\" must be an array".to_string(),
                    })
                }
            };
            let mut out = Vec::with_capacity(rows.len());
            for (idx, row) in rows.into_iter().enumerate() {
                let Value::Array(cells) = row else {
                    return Err(DatasetError::JsonShape {
                        message: format!("row {idx} is not an array"),
                    });
                };
                let mut cells: Vec<CellValue> = cells.iter().map(cell_from_json).collect();
                cells.resize(columns.len().max(cells.len()), CellValue::Empty);
                out.push(cells);
            }
            Ok(SourceTable { columns, rows: out })
        }
        Value::Array(records) => {
            let mut columns: Vec<ColumnId> = Vec::new();
            for record in records.iter() {
                let Value::Object(map) = record else {
                    return Err(DatasetError::JsonShape {
                        message: "array entries must be objects".to_string(),
                    });
                };
                for key in map.keys() {
                    let id = ColumnId::Text(key.clone());
                    if !columns.contains(&id) {
                        columns.push(id);
                    }
                }
            }
            let rows = records
                .iter()
                .filter_map(Value::as_object)
                .map(|map| {
                    columns
                        .iter()
                        .map(|c| map.get(&c.label()).map(cell_from_json).unwrap_or_default())
                        .collect()
                })
                .collect();
            Ok(SourceTable { columns, rows })
        }
        _ => Err(DatasetError::JsonShape {
            message: "expected an object or an array".to_string(),
        }),
    }
}

fn column_id_from_json(value: &Value) -> ColumnId {
    match value {
        Value::String(s) => ColumnId::Text(s.clone()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ColumnId::Integer(i),
            None => ColumnId::Text(n.to_string()),
        },
        other => ColumnId::Text(other.to_string()),
    }
}

fn cell_from_json(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::String(s) if s.trim().is_empty() => CellValue::Empty,
        Value::String(s) => CellValue::Text(s.clone()),
        Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or_default(),
        Value::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}
