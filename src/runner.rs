use thiserror::Error;

use crate::dataset::{date_key, Dataset, SourceTable};
use crate::fields::LogicalField;
use crate::matcher::{self, ColumnLabels};
use crate::render::{self, TableInput};
use crate::template::{ColumnMapping, MappedColumn, TemplateConfig, NO_COLUMN};

#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Base configuration; its mapping is a preference, checked against the table.
    pub template: TemplateConfig,
    /// Explicit `field -> column label` choices, applied after matching.
    pub column_overrides: Vec<(LogicalField, String)>,
    /// `None` keeps every dated row.
    pub selected_dates: Option<Vec<String>>,
    pub link_override: Option<String>,
    /// Extra chrono formats tried on scheduled dates.
    pub date_formats: Vec<String>,
    /// Fallbacks noticed while building the options (template keys, display
    /// order); reported ahead of the run's own warnings.
    pub warnings: Vec<String>,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("missing column assignments for: {}", .fields.iter().map(|f| f.canonical_name()).collect::<Vec<_>>().join(", "))]
    MissingMapping { fields: Vec<LogicalField> },

    #[error("unknown column '{column}' for {field}")]
    UnknownColumn { field: LogicalField, column: String },
}

#[derive(Clone, Debug)]
pub struct RenderOutput {
    pub full_html: String,
    pub table_html: String,
    pub page_html: String,
    /// The configuration actually used, with the resolved mapping; suitable for saving.
    pub template: TemplateConfig,
    pub available_dates: Vec<String>,
    pub row_count: usize,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        Ok(Self { options })
    }

    /// Template preference, then header matching, then explicit overrides.
    pub fn resolve_mapping(&self, table: &SourceTable) -> Result<ColumnMapping, RunnerError> {
        let mut mapping = matcher::resolve_mapping(&table.columns, &self.options.template.map_cols);
        let labels = ColumnLabels::new(&table.columns);
        for (field, label) in self.options.column_overrides.iter() {
            let column = if label.trim().is_empty() || label.trim() == NO_COLUMN {
                MappedColumn::None
            } else {
                let id = labels.resolve(label).ok_or_else(|| RunnerError::UnknownColumn {
                    field: *field,
                    column: label.clone(),
                })?;
                MappedColumn::Column(id.clone())
            };
            mapping.set(*field, column);
        }
        Ok(mapping)
    }

    fn complete_mapping(&self, table: &SourceTable) -> Result<ColumnMapping, RunnerError> {
        let mapping = self.resolve_mapping(table)?;
        let missing = matcher::missing_required(&mapping);
        if !missing.is_empty() {
            return Err(RunnerError::MissingMapping { fields: missing });
        }
        Ok(mapping)
    }

    /// Distinct scheduled dates of `table`, before any filtering.
    pub fn available_dates(&self, table: &SourceTable) -> Result<Vec<String>, RunnerError> {
        let mapping = self.complete_mapping(table)?;
        Ok(Dataset::from_source(table, &mapping, &self.options.date_formats).available_dates())
    }

    pub fn run(&self, table: &SourceTable) -> Result<RenderOutput, RunnerError> {
        let mapping = self.complete_mapping(table)?;
        let dataset = Dataset::from_source(table, &mapping, &self.options.date_formats);
        let available_dates = dataset.available_dates();
        let formats = &self.options.date_formats;
        let selected: Vec<String> = match self.options.selected_dates.as_ref() {
            Some(dates) => dates.iter().map(|d| date_key(d, formats)).collect(),
            None => available_dates.clone(),
        };
        let mut unknown = Vec::new();
        for (date, key) in self.options.selected_dates.iter().flatten().zip(selected.iter()) {
            if !available_dates.contains(key) {
                unknown.push(format!("date '{}' does not appear in the data", date.trim()));
            }
        }
        let dataset = dataset
            .filter_dates(&selected)
            .override_connection_link(self.options.link_override.as_deref().unwrap_or_default());
        log::info!(
            "rendering {} of {} rows",
            dataset.len(),
            table.rows.len()
        );

        let mut template = self.options.template.clone();
        template.map_cols = mapping;
        let style = template.style();
        let rendered = render::assemble(&TableInput::from_template(&template, &style, dataset.rows()));
        let page_html = render::standalone_page(&rendered.table_html);

        for w in unknown.iter() {
            log::warn!("{w}");
        }
        let mut warnings = self.options.warnings.clone();
        warnings.extend(unknown);
        Ok(RenderOutput {
            full_html: rendered.full_html,
            table_html: rendered.table_html,
            page_html,
            template,
            available_dates,
            row_count: dataset.len(),
            warnings,
        })
    }
}
