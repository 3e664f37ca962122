use std::{
    io::Write,
    path::{Path, PathBuf},
};

use path_table_core::{
    DEFAULT_EXPORT_FILE, PathStyle, Table, TabulateOptions, Tabulation,
    encoding::encoding_for_label, export_csv, tabulate_file,
};
use rustyline::{DefaultEditor, error::ReadlineError};
use snafu::ResultExt;

use crate::{
    error::{CliResult, ReadlineSnafu},
    render::{
        DEFAULT_MAX_ROWS, page_output, preview_message, print_tabulation, render_preview,
        write_summary,
    },
};

const HISTORY_FILE: &str = ".pathtab_history";

enum CommandAction {
    Continue,
    Break,
}

#[allow(dead_code)]
struct CommandResult {
    action: CommandAction,
    table: Option<Table>,
    exported: Option<PathBuf>,
}

impl CommandResult {
    fn proceed() -> Self {
        CommandResult {
            action: CommandAction::Continue,
            table: None,
            exported: None,
        }
    }
}

/// Session state; every command that needs the table re-runs the pipeline
/// from `input` with `opts`.
struct ShellContext {
    input: Option<PathBuf>,
    opts: TabulateOptions,
    pager: bool,
    last: Option<Tabulation>,
}

fn print_help() {
    println!(
        r#"commands:
  load <path>           load a path listing and show it
  files [on|off]        toggle (or set) "only paths with a file name"
  show [--max-rows N]   re-read the listing and show the table
  export [PATH]         write CSV (UTF-8 with BOM), default: {DEFAULT_EXPORT_FILE}
  style windows|posix   path rules used to split drives and folders
  encoding <label|auto> force an encoding or go back to detection
  status                show current settings
  \pager                toggle pager output (less -S)
  clear | cls
  help
  exit | quit
"#
    );
}

fn clear_screen() {
    // ANSI clear screen + cursor home; best-effort.
    print!("\x1b[2J\x1b[H");
    let _ = std::io::stdout().flush();
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn unquote(raw: &str) -> &str {
    let trimmed = raw.trim();
    for q in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(q)
            .and_then(|rest| rest.strip_suffix(q))
        {
            return inner;
        }
    }
    trimmed
}

fn parse_max_rows(rest: &str) -> Result<usize, String> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(DEFAULT_MAX_ROWS);
    }

    let value = rest
        .strip_prefix("--max-rows=")
        .or_else(|| rest.strip_prefix("--max-rows").map(str::trim))
        .ok_or_else(|| format!("unknown flag: {rest}"))?;
    if value.is_empty() {
        return Err("missing value for --max-rows".to_string());
    }
    value
        .parse::<usize>()
        .map_err(|_| "invalid --max-rows value".to_string())
}

/// Arguments of `name` when `trimmed` invokes it; `None` for other commands
/// (including ones that merely start with `name`, like `filesx`).
fn command_args<'a>(trimmed: &'a str, name: &str) -> Option<&'a str> {
    let rest = trimmed.strip_prefix(name)?;
    (rest.is_empty() || rest.starts_with(' ')).then_some(rest)
}

/// Re-run the pipeline.
///
/// A decode failure is reported and replaced by an empty table; any other
/// failure (e.g. an unreadable listing) is reported and yields `None`.
fn refresh(ctx: &mut ShellContext) -> Option<Table> {
    let Some(input) = ctx.input.as_deref() else {
        println!("no listing loaded. use `load <path>`.");
        return None;
    };

    match tabulate_file(input, &ctx.opts) {
        Ok(tab) => {
            let table = tab.table.clone();
            ctx.last = Some(tab);
            Some(table)
        }
        Err(e) => {
            println!("{e}");
            ctx.last = None;
            e.is_decode_failure().then(Table::empty)
        }
    }
}

fn show_last(ctx: &ShellContext, max_rows: usize) {
    let Some(tab) = ctx.last.as_ref() else {
        return;
    };

    if ctx.pager {
        if let Some(rendered) = render_preview(&tab.table, usize::MAX) {
            let _ = page_output(&rendered);
        }
        if let Some(message) = preview_message(&tab.table, usize::MAX) {
            println!("{message}");
        }
        let _ = write_summary(tab, &mut std::io::stdout());
    } else {
        let _ = print_tabulation(tab, max_rows);
    }
}

fn refresh_and_show(ctx: &mut ShellContext, max_rows: usize) -> CommandResult {
    let table = refresh(ctx);
    show_last(ctx, max_rows);
    CommandResult {
        table,
        ..CommandResult::proceed()
    }
}

fn print_status(ctx: &ShellContext) {
    match &ctx.input {
        Some(path) => println!("input: {}", path.display()),
        None => println!("input: (none)"),
    }
    println!("files only: {}", on_off(ctx.opts.filter_files));
    println!("style: {}", ctx.opts.style);
    match ctx.opts.encoding {
        Some(enc) => println!("encoding: {}", enc.name()),
        None => println!("encoding: auto"),
    }
    println!("pager: {}", on_off(ctx.pager));
}

fn process_command(ctx: &mut ShellContext, trimmed: &str) -> CliResult<CommandResult> {
    if trimmed == "exit" || trimmed == "quit" {
        return Ok(CommandResult {
            action: CommandAction::Break,
            ..CommandResult::proceed()
        });
    }

    if trimmed == "help" {
        print_help();
        return Ok(CommandResult::proceed());
    }

    if trimmed == "clear" || trimmed == "cls" {
        clear_screen();
        return Ok(CommandResult::proceed());
    }

    if trimmed == "status" {
        print_status(ctx);
        return Ok(CommandResult::proceed());
    }

    if trimmed == r"\pager" || trimmed == r"\\pager" {
        ctx.pager = !ctx.pager;
        println!("pager: {}", on_off(ctx.pager));
        return Ok(CommandResult::proceed());
    }

    if let Some(rest) = trimmed.strip_prefix("load ") {
        let path = unquote(rest);
        if path.is_empty() {
            println!("load requires a path");
            return Ok(CommandResult::proceed());
        }
        ctx.input = Some(PathBuf::from(path));
        return Ok(refresh_and_show(ctx, DEFAULT_MAX_ROWS));
    }

    if let Some(rest) = command_args(trimmed, "files") {
        let flag = match rest.trim() {
            "" => !ctx.opts.filter_files,
            "on" => true,
            "off" => false,
            _ => {
                println!("usage: files [on|off]");
                return Ok(CommandResult::proceed());
            }
        };
        ctx.opts.filter_files = flag;
        println!("files only: {}", on_off(flag));
        if ctx.input.is_none() {
            return Ok(CommandResult::proceed());
        }
        return Ok(refresh_and_show(ctx, DEFAULT_MAX_ROWS));
    }

    if let Some(rest) = command_args(trimmed, "style") {
        ctx.opts.style = match rest.trim() {
            "windows" => PathStyle::Windows,
            "posix" => PathStyle::Posix,
            _ => {
                println!("usage: style windows|posix");
                return Ok(CommandResult::proceed());
            }
        };
        println!("style: {}", ctx.opts.style);
        return Ok(CommandResult::proceed());
    }

    if let Some(rest) = command_args(trimmed, "encoding") {
        let label = rest.trim();
        if label.is_empty() {
            println!("usage: encoding <label|auto>");
        } else if label == "auto" {
            ctx.opts.encoding = None;
            println!("encoding: auto");
        } else {
            match encoding_for_label(label) {
                Ok(enc) => {
                    ctx.opts.encoding = Some(enc);
                    println!("encoding: {}", enc.name());
                }
                Err(e) => println!("{e}"),
            }
        }
        return Ok(CommandResult::proceed());
    }

    if let Some(rest) = command_args(trimmed, "show") {
        let max_rows = match parse_max_rows(rest) {
            Ok(n) => n,
            Err(e) => {
                println!("{e}");
                return Ok(CommandResult::proceed());
            }
        };
        return Ok(refresh_and_show(ctx, max_rows));
    }

    if let Some(rest) = command_args(trimmed, "export") {
        let path = match unquote(rest) {
            "" => PathBuf::from(DEFAULT_EXPORT_FILE),
            p => PathBuf::from(p),
        };

        let Some(table) = refresh(ctx) else {
            return Ok(CommandResult::proceed());
        };
        return Ok(export_table(table, &path));
    }

    println!("unknown command. type 'help'.");
    Ok(CommandResult::proceed())
}

fn export_table(table: Table, path: &Path) -> CommandResult {
    match export_csv(&table, path) {
        Ok(()) => {
            println!("wrote: {} ({} rows)", path.display(), table.len());
            CommandResult {
                table: Some(table),
                exported: Some(path.to_path_buf()),
                ..CommandResult::proceed()
            }
        }
        Err(e) => {
            println!("{e}");
            CommandResult {
                table: Some(table),
                ..CommandResult::proceed()
            }
        }
    }
}

/// Run the interactive shell until `exit`, Ctrl-C or Ctrl-D.
pub fn cmd_shell(
    input: Option<PathBuf>,
    history: Option<PathBuf>,
    opts: TabulateOptions,
) -> CliResult<()> {
    let mut ctx = ShellContext {
        input,
        opts,
        pager: false,
        last: None,
    };

    let history_path = history.unwrap_or_else(|| PathBuf::from(HISTORY_FILE));

    let mut rl = DefaultEditor::new().context(ReadlineSnafu)?;

    // history best-effort
    {
        let _ = rl.load_history(&history_path);
    }

    println!("pathtab shell");
    if ctx.input.is_some() {
        refresh_and_show(&mut ctx, DEFAULT_MAX_ROWS);
    }
    println!("type 'help' for commands\n");

    loop {
        let prompt = match (ctx.opts.filter_files, ctx.pager) {
            (true, true) => "pathtab(files,pager)> ",
            (true, false) => "pathtab(files)> ",
            (false, true) => "pathtab(pager)> ",
            (false, false) => "pathtab> ",
        };

        let line = match rl.readline(prompt) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!("^D");
                break;
            }
            Err(e) => {
                println!("readline error: {e}");
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let _ = rl.add_history_entry(trimmed);

        let result = process_command(&mut ctx, trimmed)?;
        if matches!(result.action, CommandAction::Break) {
            break;
        }
    }

    {
        let _ = rl.save_history(&history_path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

    const LISTING: &str = "C:\\Users\\alice\\doc.txt\n/var/log/syslog\n\nE:\n";

    fn context_with_listing(tmp: &TempDir) -> TestResult<ShellContext> {
        let input = tmp.path().join("paths.txt");
        std::fs::write(&input, LISTING)?;
        Ok(ShellContext {
            input: Some(input),
            opts: TabulateOptions::default(),
            pager: false,
            last: None,
        })
    }

    fn empty_context() -> ShellContext {
        ShellContext {
            input: None,
            opts: TabulateOptions::default(),
            pager: false,
            last: None,
        }
    }

    #[test]
    fn show_returns_all_rows() -> TestResult {
        let tmp = TempDir::new()?;
        let mut ctx = context_with_listing(&tmp)?;

        let table = process_command(&mut ctx, "show")?.table.expect("table");
        assert_eq!(table.len(), 4);
        assert_eq!(table.folder_levels(), 3);
        Ok(())
    }

    #[test]
    fn files_toggle_reruns_with_filter() -> TestResult {
        let tmp = TempDir::new()?;
        let mut ctx = context_with_listing(&tmp)?;

        let table = process_command(&mut ctx, "files")?.table.expect("table");
        assert!(ctx.opts.filter_files);
        assert_eq!(table.len(), 1);
        assert_eq!(table.folder_levels(), 2);

        let table = process_command(&mut ctx, "files off")?.table.expect("table");
        assert!(!ctx.opts.filter_files);
        assert_eq!(table.len(), 4);
        Ok(())
    }

    #[test]
    fn show_picks_up_listing_changes() -> TestResult {
        let tmp = TempDir::new()?;
        let mut ctx = context_with_listing(&tmp)?;
        process_command(&mut ctx, "show")?;

        std::fs::write(tmp.path().join("paths.txt"), "D:\\one.txt\n")?;
        let table = process_command(&mut ctx, "show")?.table.expect("table");
        assert_eq!(table.len(), 1);
        assert_eq!(table.folder_levels(), 0);
        Ok(())
    }

    #[test]
    fn export_writes_requested_path() -> TestResult {
        let tmp = TempDir::new()?;
        let mut ctx = context_with_listing(&tmp)?;
        let out = tmp.path().join("out dir.csv");
        std::fs::write(&out, "")?;

        let res = process_command(&mut ctx, &format!("export \"{}\"", out.display()))?;
        assert_eq!(res.exported.as_deref(), Some(out.as_path()));

        let back = path_table_core::read_csv(std::fs::File::open(&out)?)?;
        assert_eq!(Some(back), res.table);
        Ok(())
    }

    #[test]
    fn decode_failure_yields_empty_table() -> TestResult {
        let tmp = TempDir::new()?;
        let mut ctx = context_with_listing(&tmp)?;
        std::fs::write(tmp.path().join("paths.txt"), b"C:\\caf\xE9.txt")?;

        process_command(&mut ctx, "encoding utf-8")?;
        let table = process_command(&mut ctx, "show")?.table.expect("table");
        assert_eq!(table, Table::empty());
        assert!(ctx.last.is_none());

        process_command(&mut ctx, "encoding auto")?;
        let table = process_command(&mut ctx, "show")?.table.expect("table");
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn export_after_decode_failure_writes_bom_only() -> TestResult {
        let tmp = TempDir::new()?;
        let mut ctx = context_with_listing(&tmp)?;
        std::fs::write(tmp.path().join("paths.txt"), b"C:\\caf\xE9.txt")?;
        let out = tmp.path().join("empty.csv");

        process_command(&mut ctx, "encoding utf-8")?;
        let res = process_command(&mut ctx, &format!("export {}", out.display()))?;
        assert_eq!(res.exported.as_deref(), Some(out.as_path()));
        assert_eq!(res.table, Some(Table::empty()));
        assert_eq!(std::fs::read(&out)?, b"\xEF\xBB\xBF");
        Ok(())
    }

    #[test]
    fn export_after_read_failure_keeps_existing_file() -> TestResult {
        let tmp = TempDir::new()?;
        let mut ctx = empty_context();
        ctx.input = Some(tmp.path().join("missing.txt"));
        let keep = tmp.path().join("keep.csv");
        std::fs::write(&keep, "Drive,File Name\nC:,a.txt\n")?;

        let res = process_command(&mut ctx, &format!("export {}", keep.display()))?;
        assert!(res.exported.is_none());
        assert!(res.table.is_none());
        assert!(ctx.last.is_none());
        assert_eq!(
            std::fs::read_to_string(&keep)?,
            "Drive,File Name\nC:,a.txt\n"
        );

        assert!(process_command(&mut ctx, "show")?.table.is_none());
        Ok(())
    }

    #[test]
    fn commands_sharing_a_prefix_are_unknown() -> TestResult {
        let mut ctx = empty_context();
        for line in ["filesx", "fileson", "stylex posix", "encodingx utf-8", "exports"] {
            let res = process_command(&mut ctx, line)?;
            assert!(matches!(res.action, CommandAction::Continue));
            assert!(res.table.is_none());
            assert!(res.exported.is_none());
        }
        assert!(!ctx.opts.filter_files);
        assert_eq!(ctx.opts.style, PathStyle::Windows);
        assert!(ctx.opts.encoding.is_none());

        assert_eq!(command_args("files on", "files"), Some(" on"));
        assert_eq!(command_args("files", "files"), Some(""));
        assert_eq!(command_args("filesx", "files"), None);
        Ok(())
    }

    #[test]
    fn commands_without_input_do_not_fail() -> TestResult {
        let mut ctx = empty_context();
        assert!(process_command(&mut ctx, "show")?.table.is_none());
        assert!(process_command(&mut ctx, "export")?.exported.is_none());
        assert!(process_command(&mut ctx, "files on")?.table.is_none());
        assert!(ctx.opts.filter_files);
        Ok(())
    }

    #[test]
    fn load_sets_input_and_tabulates() -> TestResult {
        let tmp = TempDir::new()?;
        let input = tmp.path().join("list.txt");
        std::fs::write(&input, "/srv/www/index.html\n")?;

        let mut ctx = empty_context();
        let table = process_command(&mut ctx, &format!("load {}", input.display()))?
            .table
            .expect("table");
        assert_eq!(ctx.input.as_deref(), Some(input.as_path()));
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn style_and_pager_toggles() -> TestResult {
        let mut ctx = empty_context();
        process_command(&mut ctx, "style posix")?;
        assert_eq!(ctx.opts.style, PathStyle::Posix);
        process_command(&mut ctx, "style bogus")?;
        assert_eq!(ctx.opts.style, PathStyle::Posix);

        process_command(&mut ctx, r"\pager")?;
        assert!(ctx.pager);
        Ok(())
    }

    #[test]
    fn exit_and_quit_break() -> TestResult {
        let mut ctx = empty_context();
        assert!(matches!(
            process_command(&mut ctx, "exit")?.action,
            CommandAction::Break
        ));
        assert!(matches!(
            process_command(&mut ctx, "quit")?.action,
            CommandAction::Break
        ));
        Ok(())
    }

    #[test]
    fn help_and_unknown_continue() -> TestResult {
        let mut ctx = empty_context();
        let res = process_command(&mut ctx, "help")?;
        assert!(matches!(res.action, CommandAction::Continue));
        let res = process_command(&mut ctx, "showme")?;
        assert!(matches!(res.action, CommandAction::Continue));
        assert!(res.table.is_none());
        let res = process_command(&mut ctx, "not-a-command")?;
        assert!(matches!(res.action, CommandAction::Continue));
        Ok(())
    }

    #[test]
    fn max_rows_flag_parsing() {
        assert_eq!(parse_max_rows(""), Ok(DEFAULT_MAX_ROWS));
        assert_eq!(parse_max_rows(" --max-rows 5"), Ok(5));
        assert_eq!(parse_max_rows("--max-rows=0"), Ok(0));
        assert!(parse_max_rows("--max-rows").is_err());
        assert!(parse_max_rows("--max-rows x").is_err());
        assert!(parse_max_rows("--rows 3").is_err());
    }

    #[test]
    fn unquote_strips_matching_quotes() {
        assert_eq!(unquote(" \"a b.csv\" "), "a b.csv");
        assert_eq!(unquote("'x.csv'"), "x.csv");
        assert_eq!(unquote("plain.csv"), "plain.csv");
        assert_eq!(unquote("\"half.csv"), "\"half.csv");
    }
}
