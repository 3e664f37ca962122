//! CLI tool for splitting path listings into drive, folder and file columns.

mod error;
mod render;
mod shell;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use path_table_core::{
    DEFAULT_EXPORT_FILE, PathStyle, TabulateOptions, encoding::encoding_for_label, export_csv,
    tabulate_file,
};
use tracing_subscriber::EnvFilter;

use crate::{
    error::CliResult,
    render::{DEFAULT_MAX_ROWS, page_output, print_tabulation, write_tabulation},
    shell::cmd_shell,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Windows,
    Posix,
}

impl From<StyleArg> for PathStyle {
    fn from(v: StyleArg) -> Self {
        match v {
            StyleArg::Windows => PathStyle::Windows,
            StyleArg::Posix => PathStyle::Posix,
        }
    }
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Text file with one path per line
    input: PathBuf,

    /// Keep only paths whose last segment contains a '.'
    #[arg(long = "files-only", default_value_t = false)]
    files_only: bool,

    #[arg(long, value_enum, default_value_t = StyleArg::Windows)]
    style: StyleArg,

    /// Encoding label (e.g. utf-8, latin1, shift_jis); detected when omitted
    #[arg(long)]
    encoding: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the path table
    Show {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
        max_rows: usize,

        /// Page output through `less -S` (no truncation; horizontal scroll)
        #[arg(long, default_value_t = false)]
        pager: bool,

        /// Also write the table as CSV to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Write the path table as CSV (UTF-8 with BOM)
    Export {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },

    /// Interactive shell (load a listing, toggle the file filter, export)
    Shell {
        /// Listing to load on start
        input: Option<PathBuf>,

        /// Optional history file path
        #[arg(long)]
        history: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = StyleArg::Windows)]
        style: StyleArg,

        #[arg(long)]
        encoding: Option<String>,
    },
}

#[derive(Debug, Parser)]
#[command(name = "pathtab", version)]
struct Cli {
    /// Log pipeline details to stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

fn tabulate_options(
    files_only: bool,
    style: StyleArg,
    encoding: Option<&str>,
) -> CliResult<TabulateOptions> {
    let encoding = encoding.map(encoding_for_label).transpose()?;
    Ok(TabulateOptions {
        filter_files: files_only,
        style: style.into(),
        encoding,
    })
}

fn input_options(args: &InputArgs) -> CliResult<TabulateOptions> {
    tabulate_options(args.files_only, args.style, args.encoding.as_deref())
}

fn cmd_show(
    input: InputArgs,
    max_rows: usize,
    pager: bool,
    export: Option<PathBuf>,
) -> CliResult<()> {
    let opts = input_options(&input)?;
    let tab = tabulate_file(&input.input, &opts)?;

    if pager {
        let mut buf = Vec::new();
        write_tabulation(&tab, usize::MAX, &mut buf)?;
        page_output(&String::from_utf8_lossy(&buf))?;
    } else {
        print_tabulation(&tab, max_rows)?;
    }

    if let Some(path) = export {
        export_csv(&tab.table, &path)?;
        println!("wrote: {} ({} rows)", path.display(), tab.table.len());
    }
    Ok(())
}

fn cmd_export(input: InputArgs, output: &Path) -> CliResult<()> {
    let opts = input_options(&input)?;
    let tab = tabulate_file(&input.input, &opts)?;
    export_csv(&tab.table, output)?;
    println!("wrote: {} ({} rows)", output.display(), tab.table.len());
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Also bridges `log` records from path-table-core.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Command::Show {
            input,
            max_rows,
            pager,
            export,
        } => cmd_show(input, max_rows, pager, export),

        Command::Export { input, output } => cmd_export(input, &output),

        Command::Shell {
            input,
            history,
            style,
            encoding,
        } => {
            let opts = tabulate_options(false, style, encoding.as_deref())?;
            cmd_shell(input, history, opts)
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
