use std::path::PathBuf;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use env_logger::Env;
use itertools::Itertools;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::dataset::SourceTable;
use crate::fields::LogicalField;
use crate::matcher::ColumnLabels;
use crate::output::{self, OutputKind, DEFAULT_BASENAME};
use crate::runner::{Options, Runner};
use crate::snippets::{self, Snippet};
use crate::style;
use crate::template::{DisplayOrder, MappedColumn, TemplateConfig, DEFAULT_TEMPLATE_FILE, NO_COLUMN};

fn print_banner() {
    println!(
        "{} {} :: Canvas LMS session tables",
        "canvas-table".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

const HELP_COLUMN: usize = 34;

/// `-i, --in, --input <FILE>`; values that may be omitted are bracketed.
fn flag_usage(arg: &clap::Arg) -> String {
    let longs = arg
        .get_long()
        .into_iter()
        .chain(arg.get_visible_aliases().unwrap_or_default())
        .unique()
        .map(|long| format!("--{long}"));
    let flags = arg
        .get_short()
        .map(|short| format!("-{short}"))
        .into_iter()
        .chain(longs)
        .join(", ");

    if !arg.get_action().takes_values() {
        return flags;
    }
    let value = arg
        .get_value_names()
        .and_then(|names| names.first())
        .map(|name| name.as_str())
        .unwrap_or("VALUE");
    match arg.get_num_args() {
        Some(range) if range.min_values() == 0 => format!("{flags} [<{value}>]"),
        _ => format!("{flags} <{value}>"),
    }
}

/// Visible args grouped by help heading, headings in first-seen order.
fn help_sections(cmd: &clap::Command) -> Vec<(&str, Vec<&clap::Arg>)> {
    let mut sections: Vec<(&str, Vec<&clap::Arg>)> = Vec::new();
    for arg in cmd.get_arguments().filter(|a| !a.is_hide_set()) {
        let heading = arg.get_help_heading().unwrap_or("Options");
        match sections.iter_mut().find(|(h, _)| *h == heading) {
            Some((_, args)) => args.push(arg),
            None => sections.push((heading, vec![arg])),
        }
    }
    sections
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let name = cmd.get_name();
    let mut out = format!("{name} {}\n", cmd.get_version().unwrap_or_default());
    if let Some(about) = cmd.get_long_about().or(cmd.get_about()) {
        out.push_str(&format!("{about}\n"));
    }
    out.push_str(&format!("\nUsage: {name} -i <FILE> [OPTIONS]\n"));

    for (heading, args) in help_sections(&cmd) {
        out.push_str(&format!("\n{heading}:\n"));
        for arg in args {
            let usage = flag_usage(arg);
            let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
            let help = help.trim();
            if help.is_empty() {
                out.push_str(&format!("  {usage}\n"));
            } else if usage.len() > HELP_COLUMN {
                out.push_str(&format!("  {usage}\n  {:HELP_COLUMN$} {help}\n", ""));
            } else {
                out.push_str(&format!("  {usage:<HELP_COLUMN$} {help}\n"));
            }
        }
    }
    out
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn init_logging(verbose: u8) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(log_filter(verbose)))
        .format_timestamp(None)
        .try_init();
}

#[derive(Clone, Debug)]
struct RunConfig {
    input: PathBuf,
    delimiter: Option<u8>,
    options: Options,
    output_dir: PathBuf,
    basename: String,
    stdout: Option<OutputKind>,
    save_template: Option<PathBuf>,
    show_mapping: bool,
    list_dates: bool,
    no_color: bool,
}

/// Applies layout and style flags on top of the loaded template.
fn apply_template_flags(
    args: &CliArgs,
    template: &mut TemplateConfig,
    warnings: &mut Vec<String>,
) -> Result<(), String> {
    if let Some(title) = args.title.as_ref() {
        template.title = title.clone();
    }
    for raw in args.header.iter() {
        let (field, label) = crate::utils::parse_field_assignment(raw)?;
        template.header_labels.set(field, label.trim());
    }
    if let Some(raw) = args.order.as_deref() {
        let fields = crate::utils::parse_field_list_csv(raw)?;
        let (order, invalid) = DisplayOrder::or_default(fields);
        if let Some(e) = invalid {
            warnings.push(e.to_string());
        }
        template.display_order = order;
    }
    for field in crate::utils::parse_fields_set(&args.hide)? {
        template.hidden_columns.insert(field);
    }
    for field in crate::utils::parse_fields_set(&args.show)? {
        template.hidden_columns.remove(&field);
    }

    if let Some(text) = args.text.as_ref() {
        template.user_text = text.clone();
    }
    if let Some(path) = args.text_file.as_deref() {
        let path = config::expand_tilde(path);
        template.user_text = std::fs::read_to_string(&path)
            .map_err(|e| format!("failed to read text file '{}': {e}", path.display()))?;
    }
    if !args.snippet.is_empty() {
        let chosen: Vec<Snippet> = args.snippet.iter().filter_map(|s| Snippet::parse(s)).collect();
        template.user_text = snippets::append(&template.user_text, &chosen);
    }

    if let Some(color) = args.color.as_deref() {
        template.primary_color = color.trim().to_string();
    }
    if let Some(font) = args.font.as_deref() {
        template.font_family = style::resolve_font_family(font);
    }
    if let Some(v) = args.compact {
        template.compact_mode = v;
    }
    if let Some(v) = args.topic_left {
        template.topic_align_left = v;
    }
    if let Some(v) = args.protect {
        template.protect_table = v;
    }
    if args.no_th_borders {
        template.show_th_borders = false;
    }
    if args.no_td_borders {
        template.show_td_borders = false;
    }
    Ok(())
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let input = args
        .input
        .as_deref()
        .map(config::expand_tilde)
        .ok_or_else(|| "missing input file, pass -i/--input FILE".to_string())?;

    let template_path = args.template.clone().or(cfg.template.clone());
    let (mut template, mut warnings) = match template_path.as_deref() {
        Some(path) => TemplateConfig::load_with_warnings(&config::expand_tilde(path))
            .map_err(|e| e.to_string())?,
        None => (TemplateConfig::default(), Vec::new()),
    };
    apply_template_flags(&args, &mut template, &mut warnings)?;

    let mut column_overrides = Vec::new();
    for raw in args.map.iter() {
        let (field, column) = crate::utils::parse_field_assignment(raw)?;
        column_overrides.push((field, column.trim().to_string()));
    }

    let delimiter = match args.delimiter.as_deref().or(cfg.delimiter.as_deref()) {
        Some(raw) => Some(
            validation::parse_delimiter(raw).map_err(|e| format!("invalid delimiter '{raw}': {e}"))?,
        ),
        None => None,
    };

    let basename = args
        .basename
        .or(cfg.basename)
        .unwrap_or_else(|| DEFAULT_BASENAME.to_string());
    if basename.trim().is_empty() {
        return Err("invalid basename, expected a non-empty file name prefix".to_string());
    }
    let output_dir = config::expand_tilde(
        &args
            .output_dir
            .or(cfg.output_dir)
            .unwrap_or_else(|| ".".to_string()),
    );

    let save_template = match args.save_template {
        Some(path) => Some(config::expand_tilde(&path)),
        None if cfg.save_template.unwrap_or(false) => Some(PathBuf::from(DEFAULT_TEMPLATE_FILE)),
        None => None,
    };

    let options = Options {
        template,
        column_overrides,
        selected_dates: if args.date.is_empty() {
            None
        } else {
            Some(args.date.clone())
        },
        link_override: args.link.clone(),
        date_formats: cfg.date_formats.unwrap_or_default(),
        warnings,
    };

    Ok(RunConfig {
        input,
        delimiter,
        options,
        output_dir,
        basename: basename.trim().to_string(),
        stdout: args.stdout.as_deref().and_then(OutputKind::parse),
        save_template,
        show_mapping: args.show_mapping,
        list_dates: args.list_dates,
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
    })
}

fn print_mapping(runner: &Runner, table: &SourceTable) -> Result<(), String> {
    let labels = ColumnLabels::new(&table.columns);
    format_kv_line("Columns", &labels.labels().join(" | "));
    println!();
    let mapping = runner.resolve_mapping(table).map_err(|e| e.to_string())?;
    for field in LogicalField::ALL {
        let value = match mapping.get(field) {
            MappedColumn::Column(id) => id.label().green().to_string(),
            MappedColumn::None if field.is_required() => NO_COLUMN.red().to_string(),
            MappedColumn::None => NO_COLUMN.dimmed().to_string(),
        };
        format_kv_line(field.short_key(), &format!("{value}  ({})", field.canonical_name()));
    }
    Ok(())
}

fn execute(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    let table = SourceTable::from_path(&run.input, run.delimiter).map_err(|e| e.to_string())?;
    let runner = Runner::new(run.options).map_err(|e| e.to_string())?;

    if run.show_mapping {
        return print_mapping(&runner, &table);
    }
    if run.list_dates {
        for date in runner.available_dates(&table).map_err(|e| e.to_string())? {
            println!("{date}");
        }
        return Ok(());
    }

    let rendered = runner.run(&table).map_err(|e| e.to_string())?;

    if let Some(kind) = run.stdout {
        let text = output::render_kind(&rendered, kind).map_err(|e| e.to_string())?;
        println!("{text}");
        if let Some(target) = run.save_template.as_deref() {
            output::save_template(&run.output_dir, &rendered, target).map_err(|e| e.to_string())?;
        }
        return Ok(());
    }

    print_banner();
    format_kv_line("Input", &run.input.display().to_string());
    format_kv_line("Rows", &format!("{} of {}", rendered.row_count, table.rows.len()));
    let dates = if rendered.available_dates.is_empty() {
        "-".to_string()
    } else {
        rendered.available_dates.join(", ")
    };
    format_kv_line("Dates", &dates);
    format_kv_line("Color", &rendered.template.primary_color);
    format_kv_line("Compact", format_bool(rendered.template.compact_mode));
    format_kv_line("Protect", format_bool(rendered.template.protect_table));
    for w in rendered.warnings.iter() {
        println!(":: {} : {}", "Warning".yellow().bold(), w);
    }
    println!();

    let artifacts = output::write_artifacts(
        &run.output_dir,
        &run.basename,
        &rendered,
        run.save_template.as_deref(),
    )
    .map_err(|e| e.to_string())?;
    for (kind, path) in artifacts.written.iter() {
        println!("{} {:<8} {}", "✔".green(), kind.key(), path.display());
    }
    if rendered.row_count == 0 {
        println!();
        println!("{}", "no rows matched the selected dates".yellow());
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_logging(args.verbose);

    let user_config_path = args.config.as_deref().map(config::expand_tilde);

    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine a config path, pass --config FILE".to_string())?;
        if config::ensure_default_config_file(&path)? {
            println!("wrote {}", path.display());
        } else {
            println!("{} already exists", path.display());
        }
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    execute(run)
}
