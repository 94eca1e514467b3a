use std::io::Cursor;

use pretty_assertions::assert_eq;

use crate::dataset::loader::read_csv;
use crate::dataset::SourceTable;
use crate::fields::LogicalField;
use crate::runner::{Options, Runner, RunnerError};
use crate::template::{MappedColumn, TemplateConfig};

const SESIONES_CSV: &str = "\
Unidad Didáctica,Tema del encuentro,Duración ,Fecha  de realización,Enlace de Conexión,Enlace de Grabación
UD1,\"Introducción\nSesión de apertura\",90,2024-03-01,https://meet.example.com/a,https://rec.example.com/1
UD2,Cierre,60,08/03/2024,https://meet.example.com/b,
";

fn sesiones() -> SourceTable {
    read_csv(Cursor::new(SESIONES_CSV), b',').unwrap()
}

fn run(options: Options) -> crate::runner::RenderOutput {
    Runner::new(options).unwrap().run(&sesiones()).unwrap()
}

#[test]
fn two_rows_render_six_headers_and_twelve_cells() {
    let out = run(Options::default());
    assert_eq!(out.row_count, 2);
    assert_eq!(out.table_html.matches("<th ").count(), 6);
    assert_eq!(out.table_html.matches("<td ").count(), 12);
    assert!(out.table_html.contains("background-color: #ba372a"));
    assert!(out.table_html.contains("border: 1px solid #ba372a"));
    assert!(out.full_html.ends_with("</table>"));
    assert!(out.warnings.is_empty());
}

#[test]
fn primary_color_drives_header_and_borders() {
    let mut template = TemplateConfig::default();
    template.primary_color = "#0f62fe".to_string();
    let out = run(Options {
        template,
        ..Options::default()
    });
    assert!(out.table_html.starts_with(
        "<table style=\"border-collapse: collapse; width: 100%; border: 1px solid #0f62fe;\">"
    ));
    assert_eq!(out.table_html.matches("background-color: #0f62fe").count(), 6);
    assert!(!out.table_html.contains("#ba372a"));
}

#[test]
fn hiding_two_fields_keeps_remaining_order() {
    let mut template = TemplateConfig::default();
    template.hidden_columns.insert(LogicalField::Duration);
    template.hidden_columns.insert(LogicalField::RecordingLink);
    let out = run(Options {
        template,
        ..Options::default()
    });
    assert_eq!(out.table_html.matches("<th ").count(), 4);
    assert_eq!(out.table_html.matches("<td ").count(), 8);
    let headers: Vec<&str> = out
        .table_html
        .lines()
        .filter(|l| l.starts_with("<th "))
        .filter_map(|l| l.rsplit_once("\">"))
        .map(|(_, rest)| rest.trim_end_matches("</th>"))
        .collect();
    assert_eq!(
        headers,
        vec![
            "Unidad Didáctica",
            "Tema del encuentro",
            "Fecha de realización",
            "Enlace de Conexión"
        ]
    );
}

#[test]
fn topic_and_links_render_per_field() {
    let out = run(Options::default());
    assert!(out.table_html.contains(">Introducción</span><br>"));
    assert!(out.table_html.contains(">Sesión de apertura</span>"));
    assert!(out.table_html.contains("<a href=\"https://meet.example.com/b\""));
    assert_eq!(out.table_html.matches("GRABACIÓN").count(), 2);
}

#[test]
fn dates_are_normalized_and_filterable() {
    let out = run(Options {
        selected_dates: Some(vec!["2024-03-08".to_string()]),
        ..Options::default()
    });
    assert_eq!(out.available_dates, vec!["2024-03-01", "2024-03-08"]);
    assert_eq!(out.row_count, 1);
    assert!(out.table_html.contains(">Cierre</span>"));
    assert!(!out.table_html.contains("UD1"));
}

#[test]
fn unknown_selected_date_renders_empty_body_with_warning() {
    let out = run(Options {
        selected_dates: Some(vec!["2030-01-01".to_string()]),
        ..Options::default()
    });
    assert_eq!(out.row_count, 0);
    assert_eq!(out.table_html.matches("<td ").count(), 0);
    assert_eq!(out.table_html.matches("<th ").count(), 6);
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn link_override_replaces_every_connection_link() {
    let out = run(Options {
        link_override: Some("https://meet.example.com/unico".to_string()),
        ..Options::default()
    });
    assert_eq!(out.table_html.matches("https://meet.example.com/unico").count(), 2);
    assert!(!out.table_html.contains("https://meet.example.com/a"));
}

#[test]
fn missing_required_fields_block_rendering() {
    let table = read_csv(Cursor::new("Unidad,Fecha\nUD1,2024-03-01\n"), b',').unwrap();
    let err = Runner::new(Options::default()).unwrap().run(&table).unwrap_err();
    match err {
        RunnerError::MissingMapping { fields } => {
            assert_eq!(fields, vec![LogicalField::SessionTopic, LogicalField::Duration]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn explicit_overrides_and_unknown_columns() {
    let table = read_csv(Cursor::new("Módulo,Asunto,Min,Día\nM1,Repaso,45,2024-04-02\n"), b',').unwrap();
    let options = Options {
        column_overrides: vec![
            (LogicalField::DidacticUnit, "módulo".to_string()),
            (LogicalField::SessionTopic, "Asunto".to_string()),
            (LogicalField::Duration, "Min".to_string()),
            (LogicalField::ScheduledDate, "Día".to_string()),
        ],
        ..Options::default()
    };
    let out = Runner::new(options.clone()).unwrap().run(&table).unwrap();
    assert_eq!(out.row_count, 1);
    assert!(out.table_html.contains(">45</td>"));
    assert_eq!(
        out.template.map_cols.get(LogicalField::DidacticUnit),
        &MappedColumn::Column("Módulo".into())
    );

    let mut bad = options;
    bad.column_overrides.push((LogicalField::ConnectionLink, "Sala".to_string()));
    let err = Runner::new(bad).unwrap().run(&table).unwrap_err();
    assert!(matches!(err, RunnerError::UnknownColumn { .. }));
}

#[test]
fn effective_template_round_trips_through_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(Options::default());
    let artifacts = crate::output::write_artifacts(
        dir.path(),
        "semana1",
        &out,
        Some(std::path::Path::new("plantilla_tabla_canvas.json")),
    )
    .unwrap();
    assert_eq!(artifacts.written.len(), 4);

    let full = std::fs::read_to_string(dir.path().join("semana1_completo.html")).unwrap();
    let table = std::fs::read_to_string(dir.path().join("semana1_solo_tabla.txt")).unwrap();
    let page = std::fs::read_to_string(dir.path().join("semana1_solo_tabla.html")).unwrap();
    assert_eq!(full, out.full_html);
    assert_eq!(table, out.table_html);
    assert!(page.starts_with("<!doctype html>"));

    let saved = TemplateConfig::load(&dir.path().join("plantilla_tabla_canvas.json")).unwrap();
    assert_eq!(saved, out.template);
    let again = run(Options {
        template: saved,
        ..Options::default()
    });
    assert_eq!(again.full_html, out.full_html);
}

#[test]
fn json_source_renders_like_csv() {
    let raw = r#"[
        {"Unidad Didáctica": "UD1", "Tema del encuentro": "Introducción\nSesión de apertura",
         "Duración ": 90, "Fecha  de realización": "2024-03-01",
         "Enlace de Conexión": "https://meet.example.com/a", "Enlace de Grabación": "https://rec.example.com/1"},
        {"Unidad Didáctica": "UD2", "Tema del encuentro": "Cierre", "Duración ": 60,
         "Fecha  de realización": "08/03/2024", "Enlace de Conexión": "https://meet.example.com/b",
         "Enlace de Grabación": null}
    ]"#;
    let table = crate::dataset::loader::read_json(raw).unwrap();
    let from_json = Runner::new(Options::default()).unwrap().run(&table).unwrap();
    let from_csv = run(Options::default());
    assert_eq!(from_json.table_html, from_csv.table_html);
}

#[test]
fn protected_user_text_cannot_break_the_table() {
    let mut template = TemplateConfig::default();
    template.user_text = "<p>Hola</p></table><script>x()</script>".to_string();
    let out = run(Options {
        template,
        ..Options::default()
    });
    assert_eq!(out.full_html.matches("</table>").count(), 1);
    assert!(!out.full_html.contains("x()"));
    assert!(out.full_html.starts_with("<div"));
}

#[test]
fn dates_typed_as_in_the_spreadsheet_select_rows() {
    let out = run(Options {
        selected_dates: Some(vec![" 08/03/2024".to_string(), "2024-03-01".to_string()]),
        ..Options::default()
    });
    assert_eq!(out.row_count, 2);
    assert!(out.warnings.is_empty());

    let out = run(Options {
        selected_dates: Some(vec!["08/03/2024".to_string()]),
        ..Options::default()
    });
    assert_eq!(out.row_count, 1);
    assert!(out.warnings.is_empty());
    assert!(out.table_html.contains(">Cierre</span>"));
}

#[test]
fn option_warnings_lead_the_render_warnings() {
    let out = run(Options {
        selected_dates: Some(vec!["2030-01-01".to_string()]),
        warnings: vec!["'compact_mode' should be a boolean".to_string()],
        ..Options::default()
    });
    assert_eq!(
        out.warnings,
        vec![
            "'compact_mode' should be a boolean".to_string(),
            "date '2030-01-01' does not appear in the data".to_string(),
        ]
    );
}

#[test]
fn saved_template_follows_the_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(Options::default());
    let nested = dir.path().join("salida");
    let path = crate::output::save_template(&nested, &out, std::path::Path::new("plantilla.json")).unwrap();
    assert_eq!(path, nested.join("plantilla.json"));
    assert_eq!(TemplateConfig::load(&path).unwrap(), out.template);
}
