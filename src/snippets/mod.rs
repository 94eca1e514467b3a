//! Ready-made HTML fragments that can be appended to the free text block.

use crate::style::{DEFAULT_FONT_FAMILY, TEXT_COLOR};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Snippet {
    H1,
    H2,
    H3,
    Bold,
    Italic,
    List,
    Paragraph,
    Link,
    Rule,
}

impl Snippet {
    pub const ALL: [Snippet; 9] = [
        Snippet::H1,
        Snippet::H2,
        Snippet::H3,
        Snippet::Bold,
        Snippet::Italic,
        Snippet::List,
        Snippet::Paragraph,
        Snippet::Link,
        Snippet::Rule,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            "bold" | "b" | "negrita" => Some(Self::Bold),
            "italic" | "i" | "cursiva" => Some(Self::Italic),
            "list" | "ul" | "lista" => Some(Self::List),
            "paragraph" | "p" | "parrafo" | "párrafo" => Some(Self::Paragraph),
            "link" | "a" | "enlace" => Some(Self::Link),
            "rule" | "hr" => Some(Self::Rule),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::List => "list",
            Self::Paragraph => "paragraph",
            Self::Link => "link",
            Self::Rule => "rule",
        }
    }

    pub fn html(self) -> String {
        let heading = |level: u8, label: &str| {
            format!("<h{level} style='font-family: {DEFAULT_FONT_FAMILY};'>{label}</h{level}>\n")
        };
        match self {
            Self::H1 => heading(1, "Título H1"),
            Self::H2 => heading(2, "Título H2"),
            Self::H3 => heading(3, "Título H3"),
            Self::Bold => "<strong>texto en negrita</strong> ".to_string(),
            Self::Italic => "<em>texto en cursiva</em> ".to_string(),
            Self::List => "<ul><li>Elemento 1</li><li>Elemento 2</li></ul>\n".to_string(),
            Self::Paragraph => format!(
                "<p style='font-family: {DEFAULT_FONT_FAMILY}; font-size: 12pt; color:{TEXT_COLOR};'>Tu párrafo aquí.</p>\n"
            ),
            Self::Link => "<a href='https://ejemplo.com' target='_blank'>Un enlace</a> ".to_string(),
            Self::Rule => "<hr/>\n".to_string(),
        }
    }
}

/// Appends snippets to `text` in the given order.
pub fn append(text: &str, snippets: &[Snippet]) -> String {
    let mut out = text.to_string();
    for s in snippets {
        out.push_str(&s.html());
    }
    out
}
