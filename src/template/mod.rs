//! Persisted rendering configuration ("template").
//!
//! A template is one flat JSON object. Loading is lenient: every key has its
//! own default, used when the key is absent or holds a value of the wrong
//! type. Only input that is not a JSON object at all is rejected.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::dataset::ColumnId;
use crate::fields::LogicalField;
use crate::style::{StyleConfig, DEFAULT_FONT_FAMILY, DEFAULT_PRIMARY_COLOR};

pub const NO_COLUMN: &str = "(ninguna)";
pub const DEFAULT_TITLE: &str = "Programación de encuentros sincrónicos";
pub const DEFAULT_TEMPLATE_FILE: &str = "plantilla_tabla_canvas.json";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("malformed template: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed template: expected a JSON object at the top level")]
    NotAnObject,

    #[error("failed to encode template: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("template file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MappedColumn {
    Column(ColumnId),
    None,
}

impl From<ColumnId> for MappedColumn {
    fn from(id: ColumnId) -> Self {
        match id {
            ColumnId::Text(s) if s == NO_COLUMN => MappedColumn::None,
            other => MappedColumn::Column(other),
        }
    }
}

static UNMAPPED: MappedColumn = MappedColumn::None;

/// Logical field to source column. Always holds all six fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMapping(BTreeMap<LogicalField, MappedColumn>);

impl Default for ColumnMapping {
    fn default() -> Self {
        Self(LogicalField::ALL.into_iter().map(|f| (f, MappedColumn::None)).collect())
    }
}

impl ColumnMapping {
    pub fn get(&self, field: LogicalField) -> &MappedColumn {
        self.0.get(&field).unwrap_or(&UNMAPPED)
    }

    pub fn set(&mut self, field: LogicalField, column: MappedColumn) {
        self.0.insert(field, column);
    }

    pub fn iter(&self) -> impl Iterator<Item = (LogicalField, &MappedColumn)> {
        self.0.iter().map(|(f, c)| (*f, c))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderLabels(BTreeMap<LogicalField, String>);

impl Default for HeaderLabels {
    fn default() -> Self {
        Self(
            LogicalField::ALL
                .into_iter()
                .map(|f| (f, f.canonical_name().to_string()))
                .collect(),
        )
    }
}

impl HeaderLabels {
    pub fn get(&self, field: LogicalField) -> &str {
        self.0
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| field.canonical_name())
    }

    pub fn set(&mut self, field: LogicalField, label: impl Into<String>) {
        self.0.insert(field, label.into());
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("display order [{}] is not a permutation of the six fields, using the default order", candidate.join(", "))]
pub struct InvalidDisplayOrder {
    pub candidate: Vec<String>,
}

/// A permutation of all six logical fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayOrder(Vec<LogicalField>);

impl Default for DisplayOrder {
    fn default() -> Self {
        Self(LogicalField::ALL.to_vec())
    }
}

impl DisplayOrder {
    pub fn try_new(candidate: Vec<LogicalField>) -> Result<Self, InvalidDisplayOrder> {
        let distinct: BTreeSet<LogicalField> = candidate.iter().copied().collect();
        if candidate.len() != LogicalField::ALL.len() || distinct.len() != candidate.len() {
            return Err(InvalidDisplayOrder {
                candidate: candidate.iter().map(|f| f.to_string()).collect(),
            });
        }
        Ok(Self(candidate))
    }

    /// Falls back to the canonical order, returning the warning when it did.
    pub fn or_default(candidate: Vec<LogicalField>) -> (Self, Option<InvalidDisplayOrder>) {
        match Self::try_new(candidate) {
            Ok(order) => (order, None),
            Err(e) => {
                log::warn!("{e}");
                (Self::default(), Some(e))
            }
        }
    }

    pub fn fields(&self) -> &[LogicalField] {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateConfig {
    pub map_cols: ColumnMapping,
    pub header_labels: HeaderLabels,
    pub display_order: DisplayOrder,
    pub hidden_columns: BTreeSet<LogicalField>,
    pub title: String,
    pub user_text: String,
    pub primary_color: String,
    pub compact_mode: bool,
    pub font_family: String,
    pub topic_align_left: bool,
    pub protect_table: bool,
    pub show_th_borders: bool,
    pub show_td_borders: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            map_cols: ColumnMapping::default(),
            header_labels: HeaderLabels::default(),
            display_order: DisplayOrder::default(),
            hidden_columns: BTreeSet::new(),
            title: DEFAULT_TITLE.to_string(),
            user_text: String::new(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            compact_mode: false,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            topic_align_left: false,
            protect_table: true,
            show_th_borders: true,
            show_td_borders: true,
        }
    }
}

impl TemplateConfig {
    pub fn style(&self) -> StyleConfig {
        StyleConfig::new(
            &self.primary_color,
            self.compact_mode,
            &self.font_family,
            self.topic_align_left,
            self.show_th_borders,
            self.show_td_borders,
        )
    }

    /// Every key is always emitted; the raw user text is kept unsanitized.
    pub fn to_json(&self) -> Value {
        let map_cols: Map<String, Value> = self
            .map_cols
            .iter()
            .map(|(f, c)| {
                let value = match c {
                    MappedColumn::Column(ColumnId::Integer(n)) => Value::from(*n),
                    MappedColumn::Column(ColumnId::Text(s)) => Value::from(s.as_str()),
                    MappedColumn::None => Value::from(NO_COLUMN),
                };
                (f.canonical_name().to_string(), value)
            })
            .collect();
        let header_labels: Map<String, Value> = LogicalField::ALL
            .into_iter()
            .map(|f| (f.canonical_name().to_string(), Value::from(self.header_labels.get(f))))
            .collect();
        let mut out = Map::new();
        out.insert("map_cols".into(), Value::Object(map_cols));
        out.insert("header_labels".into(), Value::Object(header_labels));
        out.insert(
            "display_order".into(),
            field_names(self.display_order.fields().iter().copied()),
        );
        out.insert(
            "hidden_columns".into(),
            field_names(self.hidden_columns.iter().copied()),
        );
        out.insert("titulo_principal".into(), Value::from(self.title.as_str()));
        out.insert("texto_html".into(), Value::from(self.user_text.as_str()));
        out.insert("primary_color".into(), Value::from(self.primary_color.as_str()));
        out.insert("compact_mode".into(), Value::from(self.compact_mode));
        out.insert("font_family".into(), Value::from(self.font_family.as_str()));
        out.insert("tema_align_left".into(), Value::from(self.topic_align_left));
        out.insert("protect_table".into(), Value::from(self.protect_table));
        out.insert("show_th_borders".into(), Value::from(self.show_th_borders));
        out.insert("show_td_borders".into(), Value::from(self.show_td_borders));
        Value::Object(out)
    }

    pub fn to_json_string(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, TemplateError> {
        Self::decode_str(raw).map(|(config, _)| config)
    }

    fn decode_str(raw: &str) -> Result<(Self, Vec<String>), TemplateError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| TemplateError::Malformed { source: e })?;
        Self::decode(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, TemplateError> {
        Self::decode(value).map(|(config, _)| config)
    }

    /// Like `from_json_value`, also returning what was defaulted and why.
    pub fn decode(value: &Value) -> Result<(Self, Vec<String>), TemplateError> {
        let obj = value.as_object().ok_or(TemplateError::NotAnObject)?;
        let mut d = Decoder {
            obj,
            warnings: Vec::new(),
        };
        let defaults = Self::default();

        let config = Self {
            map_cols: d.map_cols(),
            header_labels: d.header_labels(),
            display_order: d.display_order(),
            hidden_columns: d.hidden_columns(),
            title: d.string("titulo_principal", defaults.title),
            user_text: d.string("texto_html", defaults.user_text),
            primary_color: d.string("primary_color", defaults.primary_color),
            compact_mode: d.boolean("compact_mode", defaults.compact_mode),
            font_family: d.string("font_family", defaults.font_family),
            topic_align_left: d.boolean("tema_align_left", defaults.topic_align_left),
            protect_table: d.boolean("protect_table", defaults.protect_table),
            show_th_borders: d.boolean("show_th_borders", defaults.show_th_borders),
            show_td_borders: d.boolean("show_td_borders", defaults.show_td_borders),
        };
        for w in d.warnings.iter() {
            log::warn!("template: {w}");
        }
        Ok((config, d.warnings))
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        Self::load_with_warnings(path).map(|(config, _)| config)
    }

    /// Reads a saved template, keeping the notes about defaulted keys so the
    /// caller can report them next to the render warnings.
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<String>), TemplateError> {
        let raw = std::fs::read_to_string(path).map_err(|e| TemplateError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::decode_str(&raw)
    }

    pub fn save(&self, path: &Path) -> Result<(), TemplateError> {
        let contents = self.to_json_string()?;
        std::fs::write(path, contents).map_err(|e| TemplateError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}

fn field_names(fields: impl Iterator<Item = LogicalField>) -> Value {
    Value::Array(fields.map(|f| Value::from(f.canonical_name())).collect())
}

struct Decoder<'a> {
    obj: &'a Map<String, Value>,
    warnings: Vec<String>,
}

impl<'a> Decoder<'a> {
    fn string(&mut self, key: &str, default: String) -> String {
        match self.obj.get(key) {
            None => default,
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                self.warnings
                    .push(format!("'{key}' should be a string, got {other}; using default"));
                default
            }
        }
    }

    fn boolean(&mut self, key: &str, default: bool) -> bool {
        match self.obj.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.warnings
                    .push(format!("'{key}' should be a boolean, got {other}; using default"));
                default
            }
        }
    }

    fn object(&mut self, key: &str) -> Vec<(LogicalField, &'a Value)> {
        let root: &'a Map<String, Value> = self.obj;
        let obj = match root.get(key) {
            None => return Vec::new(),
            Some(Value::Object(obj)) => obj,
            Some(other) => {
                self.warnings
                    .push(format!("'{key}' should be an object, got {other}; using default"));
                return Vec::new();
            }
        };
        let mut out = Vec::new();
        for (name, value) in obj.iter() {
            match LogicalField::parse(name) {
                Some(field) => out.push((field, value)),
                None => self.warnings.push(format!("'{key}': unknown field '{name}' ignored")),
            }
        }
        out
    }

    fn field_names(&mut self, key: &str) -> Option<Vec<Result<LogicalField, String>>> {
        match self.obj.get(key) {
            None => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => LogicalField::parse(s).ok_or_else(|| s.clone()),
                        other => Err(other.to_string()),
                    })
                    .collect(),
            ),
            Some(other) => {
                self.warnings
                    .push(format!("'{key}' should be an array, got {other}; using default"));
                None
            }
        }
    }

    fn map_cols(&mut self) -> ColumnMapping {
        let mut mapping = ColumnMapping::default();
        for (field, value) in self.object("map_cols") {
            let column = match value {
                Value::String(s) => MappedColumn::from(ColumnId::Text(s.clone())),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => MappedColumn::Column(ColumnId::Integer(i)),
                    None => MappedColumn::Column(ColumnId::Text(n.to_string())),
                },
                Value::Null => MappedColumn::None,
                other => {
                    self.warnings
                        .push(format!("'map_cols': unusable column {other} for {field}"));
                    MappedColumn::None
                }
            };
            mapping.set(field, column);
        }
        mapping
    }

    fn header_labels(&mut self) -> HeaderLabels {
        let mut labels = HeaderLabels::default();
        for (field, value) in self.object("header_labels") {
            match value {
                Value::String(s) => labels.set(field, s.clone()),
                other => self
                    .warnings
                    .push(format!("'header_labels': label {other} for {field} is not a string")),
            }
        }
        labels
    }

    fn display_order(&mut self) -> DisplayOrder {
        let Some(names) = self.field_names("display_order") else {
            return DisplayOrder::default();
        };
        if let Some(bad) = names.iter().find_map(|r| r.as_ref().err()) {
            self.warnings
                .push(format!("'display_order': unknown field {bad}, using the default order"));
            return DisplayOrder::default();
        }
        let fields = names.into_iter().filter_map(Result::ok).collect();
        match DisplayOrder::try_new(fields) {
            Ok(order) => order,
            Err(e) => {
                self.warnings.push(e.to_string());
                DisplayOrder::default()
            }
        }
    }

    fn hidden_columns(&mut self) -> BTreeSet<LogicalField> {
        let mut out = BTreeSet::new();
        for name in self.field_names("hidden_columns").unwrap_or_default() {
            match name {
                Ok(field) => {
                    out.insert(field);
                }
                Err(bad) => self
                    .warnings
                    .push(format!("'hidden_columns': unknown field {bad} ignored")),
            }
        }
        out
    }
}
