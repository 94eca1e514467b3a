use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::runner::RenderOutput;
use crate::template::{TemplateError, DEFAULT_TEMPLATE_FILE};

pub const DEFAULT_BASENAME: &str = "tabla_canvas";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    Full,
    Table,
    Page,
    Template,
}

impl OutputKind {
    pub const ALL: [OutputKind; 4] = [
        OutputKind::Full,
        OutputKind::Table,
        OutputKind::Page,
        OutputKind::Template,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "full" | "completo" => Some(Self::Full),
            "table" | "tabla" | "txt" => Some(Self::Table),
            "page" | "html" => Some(Self::Page),
            "template" | "plantilla" | "json" => Some(Self::Template),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Table => "table",
            Self::Page => "page",
            Self::Template => "template",
        }
    }

    /// File name written for this artifact; templates ignore the basename.
    pub fn file_name(self, basename: &str) -> String {
        match self {
            Self::Full => format!("{basename}_completo.html"),
            Self::Table => format!("{basename}_solo_tabla.txt"),
            Self::Page => format!("{basename}_solo_tabla.html"),
            Self::Template => DEFAULT_TEMPLATE_FILE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create output directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Template(#[from] TemplateError),
}

/// Files written by one run, in write order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Artifacts {
    pub written: Vec<(OutputKind, PathBuf)>,
}

/// Content of one artifact as it is written to disk or stdout.
pub fn render_kind(output: &RenderOutput, kind: OutputKind) -> Result<String, OutputError> {
    Ok(match kind {
        OutputKind::Full => output.full_html.clone(),
        OutputKind::Table => output.table_html.clone(),
        OutputKind::Page => output.page_html.clone(),
        OutputKind::Template => output.template.to_json_string()?,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), OutputError> {
    std::fs::write(path, contents).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir(dir: &Path) -> Result<(), OutputError> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Where a template target ends up: relative paths land in `dir`.
pub fn template_path(dir: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        target.to_path_buf()
    } else {
        dir.join(target)
    }
}

/// Saves the effective template of `output` and returns the path written.
pub fn save_template(dir: &Path, output: &RenderOutput, target: &Path) -> Result<PathBuf, OutputError> {
    let path = template_path(dir, target);
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    output.template.save(&path)?;
    log::debug!("wrote {}", path.display());
    Ok(path)
}

/// Writes the three HTML artifacts into `dir`, plus the effective template
/// when `save_template` is given.
pub fn write_artifacts(
    dir: &Path,
    basename: &str,
    output: &RenderOutput,
    save_template: Option<&Path>,
) -> Result<Artifacts, OutputError> {
    create_dir(dir)?;

    let mut artifacts = Artifacts::default();
    for kind in [OutputKind::Full, OutputKind::Table, OutputKind::Page] {
        let path = dir.join(kind.file_name(basename));
        write_file(&path, &render_kind(output, kind)?)?;
        log::debug!("wrote {}", path.display());
        artifacts.written.push((kind, path));
    }

    if let Some(target) = save_template {
        let path = self::save_template(dir, output, target)?;
        artifacts.written.push((OutputKind::Template, path));
    }
    Ok(artifacts)
}
