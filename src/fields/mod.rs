use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::utils;

/// Semantic role a spreadsheet column plays in the rendered table.
///
/// Declaration order is the canonical order: it drives matching priority,
/// the default display order and the order hidden fields are persisted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogicalField {
    #[serde(rename = "Unidad Didáctica")]
    DidacticUnit,
    #[serde(rename = "Tema del encuentro")]
    SessionTopic,
    #[serde(rename = "Duración")]
    Duration,
    #[serde(rename = "Fecha de realización")]
    ScheduledDate,
    #[serde(rename = "Enlace de Conexión")]
    ConnectionLink,
    #[serde(rename = "Enlace de Grabación")]
    RecordingLink,
}

impl LogicalField {
    pub const ALL: [LogicalField; 6] = [
        LogicalField::DidacticUnit,
        LogicalField::SessionTopic,
        LogicalField::Duration,
        LogicalField::ScheduledDate,
        LogicalField::ConnectionLink,
        LogicalField::RecordingLink,
    ];

    /// Fields that must resolve to a source column before rendering.
    pub const REQUIRED: [LogicalField; 4] = [
        LogicalField::DidacticUnit,
        LogicalField::SessionTopic,
        LogicalField::Duration,
        LogicalField::ScheduledDate,
    ];

    /// Canonical name, used as template key and default header label.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::DidacticUnit => "Unidad Didáctica",
            Self::SessionTopic => "Tema del encuentro",
            Self::Duration => "Duración",
            Self::ScheduledDate => "Fecha de realización",
            Self::ConnectionLink => "Enlace de Conexión",
            Self::RecordingLink => "Enlace de Grabación",
        }
    }

    /// Header literal found in the institutional spreadsheets, spacing quirks included.
    pub fn expected_header(self) -> &'static str {
        match self {
            Self::Duration => "Duración ",
            Self::ScheduledDate => "Fecha  de realización",
            other => other.canonical_name(),
        }
    }

    pub fn short_key(self) -> &'static str {
        match self {
            Self::DidacticUnit => "unidad",
            Self::SessionTopic => "tema",
            Self::Duration => "duracion",
            Self::ScheduledDate => "fecha",
            Self::ConnectionLink => "conexion",
            Self::RecordingLink => "grabacion",
        }
    }

    /// Substring hints tried when no header matches exactly.
    pub fn hints(self) -> &'static [&'static str] {
        match self {
            Self::DidacticUnit => &["unidad"],
            Self::SessionTopic => &["tema"],
            Self::Duration => &["duración", "duracion"],
            Self::ScheduledDate => &["fecha"],
            Self::ConnectionLink => &["conexión", "conexion", "enlace"],
            Self::RecordingLink => &["grabación", "grabacion"],
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// Parses a canonical name or short key, ignoring case, accents and spacing.
    pub fn parse(value: &str) -> Option<Self> {
        let key = utils::fold_key(value);
        if key.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|field| {
            utils::fold_key(field.canonical_name()) == key || field.short_key() == key
        })
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}
