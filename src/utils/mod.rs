use std::collections::HashSet;

use itertools::Itertools;

use crate::fields::LogicalField;

/// Trims, collapses inner whitespace and lowercases a header label.
pub fn normalize_label(value: &str) -> String {
    value.split_whitespace().join(" ").to_lowercase()
}

/// `normalize_label` plus accent folding, for user-typed field names.
pub fn fold_key(value: &str) -> String {
    normalize_label(value)
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            other => other,
        })
        .collect()
}

pub fn parse_field(value: &str) -> Result<LogicalField, String> {
    LogicalField::parse(value).ok_or_else(|| {
        format!(
            "unknown field '{}', expected one of: {}",
            value.trim(),
            LogicalField::ALL.iter().map(|f| f.short_key()).join(", ")
        )
    })
}

/// Parses `FIELD=VALUE`. The value keeps its inner spacing; only the field is trimmed.
pub fn parse_field_assignment(value: &str) -> Result<(LogicalField, String), String> {
    let (field_raw, rest) = value
        .split_once('=')
        .ok_or_else(|| "expected FIELD=VALUE".to_string())?;
    let field = parse_field(field_raw)?;
    Ok((field, rest.to_string()))
}

/// Parses a comma-separated field list, keeping duplicates so the caller can
/// judge whether it forms a permutation.
pub fn parse_field_list_csv(value: &str) -> Result<Vec<LogicalField>, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("field list is empty".to_string());
    }
    let mut out = Vec::new();
    for part in raw.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        out.push(parse_field(item)?);
    }
    if out.is_empty() {
        return Err("field list is empty".to_string());
    }
    Ok(out)
}

pub fn parse_fields_set(values: &[String]) -> Result<HashSet<LogicalField>, String> {
    let mut out = HashSet::new();
    for v in values {
        for part in v.split(',') {
            if part.trim().is_empty() {
                continue;
            }
            out.insert(parse_field(part)?);
        }
    }
    Ok(out)
}

/// Accepts `#rgb` and `#rrggbb`.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
