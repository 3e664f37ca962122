use path_table_core::PathTableError;
use snafu::Snafu;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CliError {
    #[snafu(context(false), display("{source}"))]
    Core { source: PathTableError },

    #[snafu(display("Failed to write output: {source}"))]
    WriteOutput { source: std::io::Error },

    #[snafu(display("Failed to start pager: {source}"))]
    Pager { source: std::io::Error },

    #[snafu(display("Failed to initialize readline: {source}"))]
    Readline {
        source: rustyline::error::ReadlineError,
    },
}
