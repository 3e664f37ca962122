use std::{
    io::Write,
    process::{Command, Stdio},
};

use path_table_core::{Table, Tabulation};
use snafu::ResultExt;
use tabled::{
    builder::Builder,
    settings::{Style, object::Rows, style::LineText, width::MinWidth},
};

use crate::error::{CliResult, PagerSnafu, WriteOutputSnafu};

pub const DEFAULT_MAX_ROWS: usize = 50;

const TABLE_LABEL: &str = "Paths";
const TABLE_LABEL_OFFSET: usize = 2;

/// Top-border label, e.g. `Paths: 3 folder levels`.
fn table_label(table: &Table) -> String {
    match table.folder_levels() {
        1 => format!("{TABLE_LABEL}: 1 folder level"),
        n => format!("{TABLE_LABEL}: {n} folder levels"),
    }
}

/// Render the header and at most `max_rows` rows of `table`.
///
/// Returns `None` when the table has no columns at all.
pub fn render_preview(table: &Table, max_rows: usize) -> Option<String> {
    if table.columns().is_empty() {
        return None;
    }

    let label = table_label(table);
    let min_width = TABLE_LABEL_OFFSET + label.chars().count() + 2;

    let mut builder = Builder::default();
    builder.push_record(table.columns().iter().cloned());
    for row in table.rows().iter().take(max_rows) {
        builder.push_record(row.iter().map(|cell| cell.clone().unwrap_or_default()));
    }

    let mut rendered = builder.build();
    rendered
        .with(Style::rounded())
        .with(LineText::new(label, Rows::first()).offset(TABLE_LABEL_OFFSET))
        .with(MinWidth::new(min_width));
    Some(rendered.to_string())
}

pub fn preview_message(table: &Table, max_rows: usize) -> Option<String> {
    if table.is_empty() {
        return Some("(no rows)".to_string());
    }

    if max_rows == 0 {
        return Some("(preview suppressed; use --max-rows > 0)".to_string());
    }

    if table.len() > max_rows {
        return Some(format!(
            "(showing first {max_rows} of {} rows)",
            table.len()
        ));
    }

    None
}

pub fn write_summary<W: Write>(tab: &Tabulation, out: &mut W) -> CliResult<()> {
    writeln!(out, "rows: {}", tab.table.len()).context(WriteOutputSnafu)?;
    writeln!(out, "folder_levels: {}", tab.table.folder_levels()).context(WriteOutputSnafu)?;
    writeln!(out, "encoding: {}", tab.encoding.name()).context(WriteOutputSnafu)?;
    if tab.skipped > 0 {
        writeln!(out, "skipped: {}", tab.skipped).context(WriteOutputSnafu)?;
    }
    Ok(())
}

pub fn write_tabulation<W: Write>(tab: &Tabulation, max_rows: usize, out: &mut W) -> CliResult<()> {
    if let Some(rendered) = render_preview(&tab.table, max_rows) {
        writeln!(out, "{rendered}").context(WriteOutputSnafu)?;
    }

    if let Some(message) = preview_message(&tab.table, max_rows) {
        writeln!(out, "{message}").context(WriteOutputSnafu)?;
    }

    write_summary(tab, out)
}

pub fn print_tabulation(tab: &Tabulation, max_rows: usize) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    write_tabulation(tab, max_rows, &mut stdout)
}

/// Pager command line: `$PAGER` when set and non-empty, otherwise `less -S`.
fn pager_command() -> Vec<String> {
    std::env::var("PAGER")
        .ok()
        .map(|raw| raw.split_whitespace().map(str::to_owned).collect::<Vec<_>>())
        .filter(|argv| !argv.is_empty())
        .unwrap_or_else(|| vec!["less".to_owned(), "-S".to_owned()])
}

/// Send `text` through the pager. If the pager cannot be started, say so on
/// stderr and print `text` to stdout instead.
pub fn page_output(text: &str) -> CliResult<()> {
    let argv = pager_command();
    let (program, args) = argv.split_first().map_or(("less", &[][..]), |(p, a)| (p.as_str(), a));

    let mut child = match Command::new(program).args(args).stdin(Stdio::piped()).spawn() {
        Ok(child) => child,
        Err(e) => {
            eprintln!("pager '{program}' unavailable ({e}); printing to stdout");
            std::io::stdout()
                .write_all(text.as_bytes())
                .context(WriteOutputSnafu)?;
            return Ok(());
        }
    };

    // Dropping stdin closes the pipe so the pager sees EOF.
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).context(WriteOutputSnafu)?;
    }

    child.wait().context(PagerSnafu)?;
    Ok(())
}
