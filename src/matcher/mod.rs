//! Suggests which source column feeds each logical field.
//!
//! Matching runs in two passes over the candidates, in input order: an exact
//! comparison of normalized labels against the field's known aliases, then a
//! substring scan for the field's keyword hints. The first hit wins, so
//! duplicate or colliding headers resolve deterministically.

use std::collections::HashMap;

use crate::dataset::ColumnId;
use crate::fields::LogicalField;
use crate::template::{ColumnMapping, MappedColumn};
use crate::utils::normalize_label;

fn aliases(target: LogicalField) -> [&'static str; 2] {
    [target.canonical_name(), target.expected_header()]
}

pub fn suggest(candidates: &[ColumnId], target: LogicalField) -> Option<ColumnId> {
    let normalized: Vec<String> = candidates
        .iter()
        .map(|c| normalize_label(&c.label()))
        .collect();

    let wanted: Vec<String> = aliases(target).iter().map(|a| normalize_label(a)).collect();
    if let Some(idx) = normalized.iter().position(|n| wanted.contains(n)) {
        log::debug!("{target}: exact header match '{}'", candidates[idx]);
        return Some(candidates[idx].clone());
    }

    for (idx, n) in normalized.iter().enumerate() {
        if target.hints().iter().any(|h| n.contains(h)) {
            log::debug!("{target}: hint match '{}'", candidates[idx]);
            return Some(candidates[idx].clone());
        }
    }
    None
}

/// Display label to original identifier side-table.
#[derive(Clone, Debug, Default)]
pub struct ColumnLabels {
    labels: Vec<String>,
    by_label: HashMap<String, ColumnId>,
}

impl ColumnLabels {
    pub fn new(columns: &[ColumnId]) -> Self {
        let mut labels = Vec::with_capacity(columns.len());
        let mut by_label = HashMap::new();
        for column in columns {
            let label = column.label();
            if by_label.contains_key(&label) {
                log::warn!("duplicate column label '{label}', keeping the first one");
                continue;
            }
            by_label.insert(label.clone(), column.clone());
            labels.push(label);
        }
        Self { labels, by_label }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Exact label first, then the first label equal after normalization.
    pub fn resolve(&self, label: &str) -> Option<&ColumnId> {
        if let Some(id) = self.by_label.get(label) {
            return Some(id);
        }
        let wanted = normalize_label(label);
        self.labels
            .iter()
            .find(|l| normalize_label(l) == wanted)
            .and_then(|l| self.by_label.get(l))
    }
}

/// Per field: the preferred column if the table has it, else the matcher's suggestion.
pub fn resolve_mapping(candidates: &[ColumnId], preferred: &ColumnMapping) -> ColumnMapping {
    let mut out = ColumnMapping::default();
    for field in LogicalField::ALL {
        let chosen = match preferred.get(field) {
            MappedColumn::Column(id) if candidates.contains(id) => Some(id.clone()),
            _ => suggest(candidates, field),
        };
        out.set(field, chosen.map(MappedColumn::Column).unwrap_or(MappedColumn::None));
    }
    out
}

/// Required fields with no column, in canonical order.
pub fn missing_required(mapping: &ColumnMapping) -> Vec<LogicalField> {
    LogicalField::REQUIRED
        .into_iter()
        .filter(|f| matches!(mapping.get(*f), MappedColumn::None))
        .collect()
}
