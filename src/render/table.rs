use std::collections::BTreeSet;

use crate::dataset::Row;
use crate::fields::LogicalField;
use crate::sanitize;
use crate::style::{StyleConfig, TEXT_COLOR};
use crate::template::{DisplayOrder, HeaderLabels, TemplateConfig};

use super::{cell_alignment, render_cell};

pub struct TableInput<'a> {
    pub rows: &'a [Row],
    pub title: &'a str,
    pub labels: &'a HeaderLabels,
    pub order: &'a DisplayOrder,
    pub hidden: &'a BTreeSet<LogicalField>,
    pub user_text: &'a str,
    pub style: &'a StyleConfig,
    pub protect: bool,
}

impl<'a> TableInput<'a> {
    pub fn from_template(template: &'a TemplateConfig, style: &'a StyleConfig, rows: &'a [Row]) -> Self {
        Self {
            rows,
            title: &template.title,
            labels: &template.header_labels,
            order: &template.display_order,
            hidden: &template.hidden_columns,
            user_text: &template.user_text,
            style,
            protect: template.protect_table,
        }
    }

    fn visible(&self) -> impl Iterator<Item = LogicalField> + '_ {
        self.order
            .fields()
            .iter()
            .copied()
            .filter(|f| !self.hidden.contains(f))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedTable {
    /// User block, title and table.
    pub full_html: String,
    /// The `<table>` element alone.
    pub table_html: String,
}

pub fn assemble(input: &TableInput) -> RenderedTable {
    let user_block = user_block(input.user_text, input.protect, &input.style.font);
    let title_html = title_block(input.title, input.style);
    let table_html = table(input);

    let mut full_html = String::with_capacity(user_block.len() + title_html.len() + table_html.len());
    full_html.push_str(&user_block);
    full_html.push_str(&title_html);
    full_html.push_str(&table_html);
    RenderedTable {
        full_html,
        table_html,
    }
}

/// Minimal document around the table, for opening it straight in a browser.
pub fn standalone_page(table_html: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset='utf-8'><title>Tabla Canvas</title></head><body>{table_html}</body></html>"
    )
}

fn user_block(raw: &str, protect: bool, font: &str) -> String {
    let text = sanitize::protect(raw, protect);
    if text.is_empty() {
        return String::new();
    }
    format!(
        "<div style=\"margin: 0 0 12px 0; font-family:{font}; color:{TEXT_COLOR}; font-size:11pt;\">{text}</div>"
    )
}

fn title_block(title: &str, style: &StyleConfig) -> String {
    format!(
        "\n<p style=\"text-align: left;\">\n    \
         <span style=\"font-family: {}; color: #000000; font-size: {}; font-weight: bold;\">\n        \
         {title}\n    \
         </span>\n\
         </p>\n",
        style.font, style.title_size
    )
}

fn table(input: &TableInput) -> String {
    let style = input.style;
    let mut out = format!(
        "<table style=\"border-collapse: collapse; width: 100%; border: {};\">\n<tr>\n",
        style.outer_border()
    );
    for field in input.visible() {
        out.push_str(&format!(
            "<th style=\"background-color: {}; color: #fff; text-align: center; font-family: {}; \
             font-size: {}; font-weight: bold; padding: {}; border: {};\">{}</th>\n",
            style.primary,
            style.font,
            style.header_font,
            style.padding,
            style.th_border,
            input.labels.get(field)
        ));
    }
    out.push_str("</tr>\n");

    for row in input.rows {
        out.push_str("<tr>\n");
        for field in input.visible() {
            out.push_str(&format!(
                "<td style=\"text-align: {}; font-family: {}; font-size: {}; color: {TEXT_COLOR}; \
                 border: {}; padding: {};\">{}</td>\n",
                cell_alignment(field, style),
                style.font,
                style.cell_font,
                style.td_border,
                style.padding,
                render_cell(field, row.get(field), style)
            ));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CellValue;
    use pretty_assertions::assert_eq;

    fn rows() -> Vec<Row> {
        vec![
            Row::new()
                .with(LogicalField::DidacticUnit, CellValue::Text("UD1".into()))
                .with(LogicalField::SessionTopic, CellValue::Text("Intro".into()))
                .with(LogicalField::Duration, CellValue::Number(90.0)),
        ]
    }

    #[test]
    fn empty_user_text_emits_no_wrapper() {
        let template = TemplateConfig::default();
        let style = template.style();
        let rows = rows();
        let out = assemble(&TableInput::from_template(&template, &style, &rows));
        assert!(!out.full_html.contains("<div"));
        assert!(out.full_html.ends_with(&out.table_html));
        assert!(out.full_html.starts_with("\n<p style=\"text-align: left;\">"));
    }

    #[test]
    fn user_block_is_sanitized_and_wrapped_before_title() {
        let mut template = TemplateConfig::default();
        template.user_text = "<h3>Aviso</h3><table>x</table><script>alert(1)</script>".into();
        let style = template.style();
        let rows = rows();
        let out = assemble(&TableInput::from_template(&template, &style, &rows));
        assert!(out.full_html.starts_with(
            "<div style=\"margin: 0 0 12px 0; font-family:Arial, Helvetica, sans-serif; color:#404e5c; font-size:11pt;\">\
             <h3>Aviso</h3>&lt;table&gt;x&lt;/table&gt;</div>\n<p"
        ));
        assert_eq!(out.full_html.matches("<table").count(), 1);
        assert!(!out.table_html.contains("Aviso"));
    }

    #[test]
    fn unfinished_tag_cannot_join_the_wrapper() {
        let mut template = TemplateConfig::default();
        template.user_text = "Aviso <style".into();
        let style = template.style();
        let rows = rows();
        let out = assemble(&TableInput::from_template(&template, &style, &rows));
        assert!(out.full_html.contains("11pt;\">Aviso &lt;style</div>\n<p"));
        assert!(!out.full_html.contains("<style"));
    }

    #[test]
    fn unprotected_user_text_passes_through() {
        let mut template = TemplateConfig::default();
        template.user_text = "<div>raw</div>".into();
        template.protect_table = false;
        let style = template.style();
        let out = assemble(&TableInput::from_template(&template, &style, &[]));
        assert!(!out.full_html.contains("&lt;div"));
        assert!(out.full_html.contains("<div>raw</div>"));
    }

    #[test]
    fn title_block_layout() {
        let style = StyleConfig::default();
        assert_eq!(
            title_block("Agenda", &style),
            "\n<p style=\"text-align: left;\">\n    <span style=\"font-family: Arial, Helvetica, sans-serif; \
             color: #000000; font-size: 16pt; font-weight: bold;\">\n        Agenda\n    </span>\n</p>\n"
        );
    }

    #[test]
    fn header_uses_labels_in_order() {
        let mut template = TemplateConfig::default();
        template.header_labels.set(LogicalField::Duration, "Minutos");
        let style = template.style();
        let out = assemble(&TableInput::from_template(&template, &style, &[]));
        let first_th = out.table_html.lines().nth(2).unwrap();
        assert_eq!(
            first_th,
            "<th style=\"background-color: #ba372a; color: #fff; text-align: center; font-family: Arial, Helvetica, sans-serif; \
             font-size: 12pt; font-weight: bold; padding: 8px; border: 1px solid #ba372a;\">Unidad Didáctica</th>"
        );
        assert!(out.table_html.contains(">Minutos</th>"));
    }

    #[test]
    fn body_cells_follow_alignment_and_borders() {
        let mut template = TemplateConfig::default();
        template.topic_align_left = true;
        template.show_td_borders = false;
        let style = template.style();
        let rows = rows();
        let out = assemble(&TableInput::from_template(&template, &style, &rows));
        assert!(out.table_html.contains(
            "<td style=\"text-align: left; font-family: Arial, Helvetica, sans-serif; font-size: 11pt; \
             color: #404e5c; border: 0; padding: 8px;\"><span"
        ));
        assert!(out.table_html.contains(
            "<td style=\"text-align: center; font-family: Arial, Helvetica, sans-serif; font-size: 11pt; \
             color: #404e5c; border: 0; padding: 8px;\">90</td>"
        ));
    }

    #[test]
    fn standalone_page_wraps_table() {
        assert_eq!(
            standalone_page("<table></table>"),
            "<!doctype html><html><head><meta charset='utf-8'><title>Tabla Canvas</title></head>\
             <body><table></table></body></html>"
        );
    }

    #[test]
    fn output_is_deterministic() {
        let template = TemplateConfig::default();
        let style = template.style();
        let rows = rows();
        let a = assemble(&TableInput::from_template(&template, &style, &rows));
        let b = assemble(&TableInput::from_template(&template, &style, &rows));
        assert_eq!(a, b);
    }
}
