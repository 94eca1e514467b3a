use crate::cli::args::CliArgs;
use crate::output::OutputKind;
use crate::snippets::Snippet;

/// Resolves a `--delimiter` value to its byte.
pub fn parse_delimiter(raw: &str) -> Result<u8, String> {
    match raw {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err("expected a single ASCII character or 'tab'".to_string()),
    }
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if args.input.is_none() && !args.init_config {
        return Err("missing input file, pass -i/--input FILE".to_string());
    }
    for raw in args.map.iter() {
        crate::utils::parse_field_assignment(raw)
            .map_err(|e| format!("invalid --map '{raw}': {e}"))?;
    }
    for raw in args.header.iter() {
        crate::utils::parse_field_assignment(raw)
            .map_err(|e| format!("invalid --header '{raw}': {e}"))?;
    }
    if let Some(raw) = args.order.as_deref() {
        crate::utils::parse_field_list_csv(raw)
            .map_err(|e| format!("invalid --order '{raw}': {e}"))?;
    }
    let hidden = crate::utils::parse_fields_set(&args.hide)
        .map_err(|e| format!("invalid --hide: {e}"))?;
    let shown = crate::utils::parse_fields_set(&args.show)
        .map_err(|e| format!("invalid --show: {e}"))?;
    if let Some(field) = hidden.intersection(&shown).next() {
        return Err(format!("field '{}' is both hidden and shown", field.short_key()));
    }
    if let Some(raw) = args.color.as_deref() {
        if !crate::utils::is_hex_color(raw.trim()) {
            return Err(format!("invalid --color '{raw}', expected #rgb or #rrggbb"));
        }
    }
    if let Some(raw) = args.basename.as_deref() {
        if raw.trim().is_empty() || raw.contains(['/', '\\']) {
            return Err(format!("invalid --basename '{raw}', expected a plain file name prefix"));
        }
    }
    if let Some(raw) = args.stdout.as_deref() {
        if OutputKind::parse(raw).is_none() {
            return Err(format!(
                "invalid --stdout '{raw}', expected one of: full, table, page, template"
            ));
        }
    }
    if let Some(raw) = args.delimiter.as_deref() {
        parse_delimiter(raw).map_err(|e| format!("invalid --delimiter '{raw}': {e}"))?;
    }
    for raw in args.snippet.iter() {
        if Snippet::parse(raw).is_none() {
            return Err(format!("invalid --snippet '{raw}'"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["canvas-table", "-i", "sesiones.csv"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn accepts_a_plain_run() {
        assert!(validate(&args(&[])).is_ok());
        assert!(validate(&args(&["--map", "tema=Tema del encuentro", "--color", "#0f62fe"])).is_ok());
    }

    #[test]
    fn rejects_bad_pairs_and_fields() {
        assert!(validate(&args(&["--map", "tema"])).unwrap_err().contains("FIELD=VALUE"));
        assert!(validate(&args(&["--header", "room=Sala"])).unwrap_err().contains("unknown field"));
        assert!(validate(&args(&["--hide", "nope"])).is_err());
        assert!(validate(&args(&["--order", "tema,,"])).is_ok());
    }

    #[test]
    fn rejects_bad_style_and_output_values() {
        assert!(validate(&args(&["--color", "red"])).is_err());
        assert!(validate(&args(&["--color", "#12345"])).is_err());
        assert!(validate(&args(&["--basename", " "])).is_err());
        assert!(validate(&args(&["--basename", "a/b"])).is_err());
        assert!(validate(&args(&["--stdout", "pdf"])).is_err());
        assert!(validate(&args(&["--delimiter", ";;"])).is_err());
        assert!(validate(&args(&["--snippet", "marquee"])).is_err());
    }

    #[test]
    fn hide_and_show_must_not_overlap() {
        let err = validate(&args(&["--hide", "grabacion", "--show", "grabacion"])).unwrap_err();
        assert!(err.contains("grabacion"));
    }

    #[test]
    fn input_is_required_unless_initialising_config() {
        let a = CliArgs::parse_from(["canvas-table"]);
        assert!(validate(&a).is_err());
        let a = CliArgs::parse_from(["canvas-table", "--init-config"]);
        assert!(validate(&a).is_ok());
    }

    #[test]
    fn delimiter_values() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert!(parse_delimiter("ñ").is_err());
    }
}
