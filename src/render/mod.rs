pub mod table;

use crate::dataset::CellValue;
use crate::fields::LogicalField;
use crate::style::{StyleConfig, MUTED_COLOR, TEXT_COLOR};

pub use table::{assemble, standalone_page, RenderedTable, TableInput};

pub const LINK_LABEL: &str = "ENLACE";
pub const RECORDING_LABEL: &str = "GRABACIÓN";
const ARROW: &str = "&#8594;";

/// Field-specific cell markup. Text values are inserted without escaping.
pub fn render_cell(field: LogicalField, value: &CellValue, style: &StyleConfig) -> String {
    match field {
        LogicalField::SessionTopic => render_topic(value, style),
        LogicalField::ConnectionLink => render_link(value, style),
        LogicalField::RecordingLink => format!(
            "<span style=\"color: {TEXT_COLOR}; font-weight: bold; font-family: {}; font-size: {};\">{RECORDING_LABEL}</span>",
            style.font, style.cell_font
        ),
        _ => value.to_string(),
    }
}

/// Text alignment of a body cell.
pub fn cell_alignment(field: LogicalField, style: &StyleConfig) -> &'static str {
    if field == LogicalField::SessionTopic {
        style.topic_align
    } else {
        style.cell_align
    }
}

fn render_topic(value: &CellValue, style: &StyleConfig) -> String {
    let text = value.to_string();
    match text.split_once('\n') {
        Some((main, sub)) => format!(
            "<span style=\"font-weight: bold; color: {TEXT_COLOR}; font-size: {};\">{}</span><br>\
             <span style=\"color: {MUTED_COLOR}; font-size: {};\">{}</span>",
            style.topic_main,
            main.trim(),
            style.topic_sub,
            sub.trim()
        ),
        None => format!(
            "<span style=\"font-weight: bold; color: {TEXT_COLOR}; font-size: {};\">{text}</span>",
            style.topic_main
        ),
    }
}

fn render_link(value: &CellValue, style: &StyleConfig) -> String {
    let text = value.to_string();
    let href = text.trim();
    if href.is_empty() {
        return String::new();
    }
    format!(
        "<a href=\"{href}\" target=\"_blank\" style=\"color: {}; font-weight: bold; text-decoration: underline; \
         font-family: {}; font-size: {};\">{LINK_LABEL} <span style=\"font-size:10pt;\">{ARROW}</span></a>",
        style.primary, style.font, style.cell_font
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn topic_with_subtitle_splits_on_first_line_break() {
        let style = StyleConfig::default();
        let html = render_cell(
            LogicalField::SessionTopic,
            &CellValue::Text("Intro to Systems\nPart 1: Scheduling".into()),
            &style,
        );
        assert_eq!(
            html,
            "<span style=\"font-weight: bold; color: #404e5c; font-size: 11.5pt;\">Intro to Systems</span><br>\
             <span style=\"color: #7b858d; font-size: 10pt;\">Part 1: Scheduling</span>"
        );
    }

    #[test]
    fn topic_without_subtitle_and_empty_topic() {
        let style = StyleConfig::default();
        let single = render_cell(LogicalField::SessionTopic, &CellValue::Text("Cierre".into()), &style);
        assert_eq!(
            single,
            "<span style=\"font-weight: bold; color: #404e5c; font-size: 11.5pt;\">Cierre</span>"
        );
        let empty = render_cell(LogicalField::SessionTopic, &CellValue::Empty, &style);
        assert_eq!(
            empty,
            "<span style=\"font-weight: bold; color: #404e5c; font-size: 11.5pt;\"></span>"
        );
    }

    #[test]
    fn topic_subtitle_keeps_later_line_breaks() {
        let html = render_cell(
            LogicalField::SessionTopic,
            &CellValue::Text("A\r\nB\nC".into()),
            &StyleConfig::default(),
        );
        assert!(html.contains(">A</span><br>"));
        assert!(html.contains(">B\nC</span>"));
    }

    #[test]
    fn connection_link_renders_anchor() {
        let html = render_cell(
            LogicalField::ConnectionLink,
            &CellValue::Text(" https://example.com/meet ".into()),
            &StyleConfig::default(),
        );
        assert_eq!(
            html,
            "<a href=\"https://example.com/meet\" target=\"_blank\" style=\"color: #ba372a; font-weight: bold; \
             text-decoration: underline; font-family: Arial, Helvetica, sans-serif; font-size: 11pt;\">\
             ENLACE <span style=\"font-size:10pt;\">&#8594;</span></a>"
        );
    }

    #[test]
    fn empty_connection_link_renders_nothing() {
        let style = StyleConfig::default();
        assert_eq!(render_cell(LogicalField::ConnectionLink, &CellValue::Text(String::new()), &style), "");
        assert_eq!(render_cell(LogicalField::ConnectionLink, &CellValue::Text("  ".into()), &style), "");
        assert_eq!(render_cell(LogicalField::ConnectionLink, &CellValue::Empty, &style), "");
    }

    #[test]
    fn recording_link_is_a_static_label() {
        let style = StyleConfig::default();
        let with_url = render_cell(
            LogicalField::RecordingLink,
            &CellValue::Text("https://example.com/rec".into()),
            &style,
        );
        let empty = render_cell(LogicalField::RecordingLink, &CellValue::Empty, &style);
        assert_eq!(with_url, empty);
        assert!(with_url.contains(">GRABACIÓN</span>"));
        assert!(!with_url.contains("href"));
    }

    #[test]
    fn plain_fields_use_text_form() {
        let style = StyleConfig::default();
        assert_eq!(render_cell(LogicalField::Duration, &CellValue::Number(90.0), &style), "90");
        assert_eq!(render_cell(LogicalField::DidacticUnit, &CellValue::Empty, &style), "");
        assert_eq!(
            render_cell(LogicalField::DidacticUnit, &CellValue::Text("<b>UD1</b>".into()), &style),
            "<b>UD1</b>"
        );
    }

    #[test]
    fn alignment_only_varies_for_topic() {
        let style = StyleConfig::new("#ba372a", false, "Arial", true, true, true);
        assert_eq!(cell_alignment(LogicalField::SessionTopic, &style), "left");
        assert_eq!(cell_alignment(LogicalField::Duration, &style), "center");
    }
}
