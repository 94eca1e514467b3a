use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "canvas-table",
    version,
    about = "Canvas-ready session schedule tables from spreadsheet exports",
    long_about = "canvas-table turns a session schedule (CSV, TSV or JSON) into an inline-styled HTML table that can be pasted into the Canvas LMS rich content editor.\n\nExamples:\n  canvas-table -i sesiones.csv\n  canvas-table -i sesiones.csv --date 2024-03-01 --link https://meet.example.com/abc\n  canvas-table -i sesiones.csv -t plantilla_tabla_canvas.json --stdout table\n  canvas-table -i sesiones.csv --map tema=\"Tema\" --show-mapping\n\nTip: Use --save-template to keep a layout and -t to reuse it."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'i',
        long = "in",
        visible_alias = "input",
        value_name = "FILE",
        help_heading = "Input",
        help = "Session table to read (.csv, .tsv, .txt or .json)."
    )]
    pub input: Option<String>,

    #[arg(
        short = 't',
        long = "tpl",
        visible_alias = "template",
        value_name = "FILE",
        help_heading = "Input",
        help = "Template JSON applied before any other flag."
    )]
    pub template: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.canvas-table/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        long = "dlm",
        visible_alias = "delimiter",
        value_name = "CHAR",
        help_heading = "Input",
        help = "CSV field delimiter (single character, 'tab' for tabs)."
    )]
    pub delimiter: Option<String>,

    #[arg(
        short = 'm',
        long = "map",
        value_name = "FIELD=COLUMN",
        action = ArgAction::Append,
        help_heading = "Mapping",
        help = "Assign a source column to a field (repeatable, '(ninguna)' clears it)."
    )]
    pub map: Vec<String>,

    #[arg(
        long = "show-mapping",
        help_heading = "Mapping",
        help = "Print the resolved column mapping and exit."
    )]
    pub show_mapping: bool,

    #[arg(
        short = 'd',
        long = "date",
        value_name = "DATE",
        action = ArgAction::Append,
        help_heading = "Filter",
        help = "Keep only sessions on this date (repeatable, default: all dates)."
    )]
    pub date: Vec<String>,

    #[arg(
        long = "list-dates",
        help_heading = "Filter",
        help = "Print the available session dates and exit."
    )]
    pub list_dates: bool,

    #[arg(
        short = 'l',
        long = "lnk",
        visible_alias = "link",
        value_name = "URL",
        help_heading = "Filter",
        help = "Use this connection link for every row."
    )]
    pub link: Option<String>,

    #[arg(
        long = "ttl",
        visible_alias = "title",
        value_name = "TEXT",
        help_heading = "Layout",
        help = "Main title shown above the table."
    )]
    pub title: Option<String>,

    #[arg(
        long = "hdr",
        visible_alias = "header",
        value_name = "FIELD=LABEL",
        action = ArgAction::Append,
        help_heading = "Layout",
        help = "Header label for a field (repeatable)."
    )]
    pub header: Vec<String>,

    #[arg(
        long = "ord",
        visible_alias = "order",
        value_name = "FIELDS",
        help_heading = "Layout",
        help = "Column order as six comma-separated fields."
    )]
    pub order: Option<String>,

    #[arg(
        long = "hide",
        value_name = "FIELD",
        action = ArgAction::Append,
        help_heading = "Layout",
        help = "Hide a column (repeatable)."
    )]
    pub hide: Vec<String>,

    #[arg(
        long = "show",
        value_name = "FIELD",
        action = ArgAction::Append,
        help_heading = "Layout",
        help = "Show a column hidden by the template (repeatable)."
    )]
    pub show: Vec<String>,

    #[arg(
        long = "txt",
        visible_alias = "text",
        value_name = "HTML",
        conflicts_with = "text_file",
        help_heading = "Layout",
        help = "Free text shown above the title (HTML allowed)."
    )]
    pub text: Option<String>,

    #[arg(
        long = "text-file",
        value_name = "FILE",
        help_heading = "Layout",
        help = "Read the free text block from a file."
    )]
    pub text_file: Option<String>,

    #[arg(
        long = "snippet",
        value_name = "NAME",
        action = ArgAction::Append,
        help_heading = "Layout",
        help = "Append a ready-made fragment to the free text (h1, h2, h3, bold, italic, list, paragraph, link, rule)."
    )]
    pub snippet: Vec<String>,

    #[arg(
        long = "clr",
        visible_alias = "color",
        value_name = "HEX",
        help_heading = "Style",
        help = "Primary color for header background and borders (#rgb or #rrggbb)."
    )]
    pub color: Option<String>,

    #[arg(
        long = "fnt",
        visible_alias = "font",
        value_name = "FONT",
        help_heading = "Style",
        help = "Font preset (arial, roboto, georgia, times) or a CSS font-family."
    )]
    pub font: Option<String>,

    #[arg(
        long = "compact",
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL",
        help_heading = "Style",
        help = "Smaller fonts and padding."
    )]
    pub compact: Option<bool>,

    #[arg(
        long = "topic-left",
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL",
        help_heading = "Style",
        help = "Left-align the session topic column."
    )]
    pub topic_left: Option<bool>,

    #[arg(
        long = "protect",
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL",
        help_heading = "Style",
        help = "Sanitize the free text block (default true)."
    )]
    pub protect: Option<bool>,

    #[arg(
        long = "no-th-borders",
        help_heading = "Style",
        help = "Drop header cell borders."
    )]
    pub no_th_borders: bool,

    #[arg(
        long = "no-td-borders",
        help_heading = "Style",
        help = "Drop body cell borders."
    )]
    pub no_td_borders: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output-dir",
        value_name = "DIR",
        help_heading = "Output",
        help = "Directory for the generated files (default: current directory)."
    )]
    pub output_dir: Option<String>,

    #[arg(
        long = "bn",
        visible_alias = "basename",
        value_name = "NAME",
        help_heading = "Output",
        help = "Prefix for generated file names (default: tabla_canvas)."
    )]
    pub basename: Option<String>,

    #[arg(
        long = "stdout",
        value_name = "KIND",
        help_heading = "Output",
        help = "Print one artifact (full, table, page, template) instead of writing files."
    )]
    pub stdout: Option<String>,

    #[arg(
        short = 's',
        long = "st",
        visible_alias = "save-template",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "plantilla_tabla_canvas.json",
        help_heading = "Output",
        help = "Also save the effective template (relative paths land in the output directory)."
    )]
    pub save_template: Option<String>,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,
}
