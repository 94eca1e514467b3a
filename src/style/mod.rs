pub const DEFAULT_PRIMARY_COLOR: &str = "#ba372a";
pub const DEFAULT_FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";

/// Main text color used by Canvas for body copy.
pub const TEXT_COLOR: &str = "#404e5c";
pub const MUTED_COLOR: &str = "#7b858d";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontPreset {
    Arial,
    Roboto,
    Georgia,
    TimesNewRoman,
}

impl FontPreset {
    pub const ALL: [FontPreset; 4] = [
        FontPreset::Arial,
        FontPreset::Roboto,
        FontPreset::Georgia,
        FontPreset::TimesNewRoman,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "arial" => Some(Self::Arial),
            "roboto" => Some(Self::Roboto),
            "georgia" => Some(Self::Georgia),
            "times" | "times-new-roman" | "times new roman" => Some(Self::TimesNewRoman),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Arial => "arial",
            Self::Roboto => "roboto",
            Self::Georgia => "georgia",
            Self::TimesNewRoman => "times",
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            Self::Arial => DEFAULT_FONT_FAMILY,
            Self::Roboto => "Roboto, Arial, sans-serif",
            Self::Georgia => "Georgia, serif",
            Self::TimesNewRoman => "'Times New Roman', Times, serif",
        }
    }
}

/// A preset name maps to its stack; anything else is taken as raw CSS.
pub fn resolve_font_family(value: &str) -> String {
    match FontPreset::parse(value) {
        Some(preset) => preset.css().to_string(),
        None => value.trim().to_string(),
    }
}

/// Presentation values derived from the template's style switches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleConfig {
    pub primary: String,
    pub font: String,
    pub title_size: &'static str,
    pub header_font: &'static str,
    pub cell_font: &'static str,
    pub padding: &'static str,
    pub topic_main: &'static str,
    pub topic_sub: &'static str,
    pub topic_align: &'static str,
    pub cell_align: &'static str,
    pub th_border: String,
    pub td_border: String,
}

impl StyleConfig {
    pub fn new(
        primary: &str,
        compact: bool,
        font_family: &str,
        topic_left: bool,
        show_th_borders: bool,
        show_td_borders: bool,
    ) -> Self {
        let border = |on: bool| {
            if on {
                format!("1px solid {primary}")
            } else {
                "0".to_string()
            }
        };
        Self {
            primary: primary.to_string(),
            font: font_family.to_string(),
            title_size: if compact { "14pt" } else { "16pt" },
            header_font: if compact { "11pt" } else { "12pt" },
            cell_font: if compact { "10pt" } else { "11pt" },
            padding: if compact { "4px" } else { "8px" },
            topic_main: if compact { "11pt" } else { "11.5pt" },
            topic_sub: if compact { "9.5pt" } else { "10pt" },
            topic_align: if topic_left { "left" } else { "center" },
            cell_align: "center",
            th_border: border(show_th_borders),
            td_border: border(show_td_borders),
        }
    }

    /// Border drawn around the whole table, independent of the cell toggles.
    pub fn outer_border(&self) -> String {
        format!("1px solid {}", self.primary)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_COLOR, false, DEFAULT_FONT_FAMILY, false, true, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_and_compact_sizes() {
        let normal = StyleConfig::default();
        assert_eq!(normal.title_size, "16pt");
        assert_eq!(normal.cell_font, "11pt");
        assert_eq!(normal.padding, "8px");
        assert_eq!(normal.topic_main, "11.5pt");

        let compact = StyleConfig::new("#000", true, "Georgia, serif", true, true, true);
        assert_eq!(compact.title_size, "14pt");
        assert_eq!(compact.header_font, "11pt");
        assert_eq!(compact.topic_sub, "9.5pt");
        assert_eq!(compact.topic_align, "left");
        assert_eq!(compact.cell_align, "center");
    }

    #[test]
    fn border_toggles() {
        let s = StyleConfig::new("#0f62fe", false, DEFAULT_FONT_FAMILY, false, false, true);
        assert_eq!(s.th_border, "0");
        assert_eq!(s.td_border, "1px solid #0f62fe");
        assert_eq!(s.outer_border(), "1px solid #0f62fe");
    }

    #[test]
    fn font_presets_and_raw_css() {
        assert_eq!(resolve_font_family("Times"), "'Times New Roman', Times, serif");
        assert_eq!(resolve_font_family("roboto"), "Roboto, Arial, sans-serif");
        assert_eq!(resolve_font_family(" Verdana, sans-serif "), "Verdana, sans-serif");
        for preset in FontPreset::ALL {
            assert_eq!(FontPreset::parse(preset.key()), Some(preset));
        }
    }
}
