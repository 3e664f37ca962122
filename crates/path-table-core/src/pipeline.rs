//! End-to-end run: bytes → decoded text → lines → records → table.
//!
//! Each run starts from scratch; nothing is cached between calls and every
//! input the run needs travels in [`TabulateOptions`].

use std::path::Path;

use encoding_rs::Encoding;
use log::{debug, warn};
use snafu::ResultExt;

use crate::{
    encoding::{decode, detect_encoding},
    error::{PathTableResult, ReadInputSnafu},
    record::{PathStyle, parse_line_as},
    table::{Table, build_table},
};

/// Inputs of one tabulation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabulateOptions {
    /// Keep only lines whose last segment looks like a file name.
    pub filter_files: bool,
    /// Drive syntax and separators.
    pub style: PathStyle,
    /// Decode with this encoding instead of detecting one.
    pub encoding: Option<&'static Encoding>,
}

/// Result of one tabulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Tabulation {
    /// Encoding the input was decoded with.
    pub encoding: &'static Encoding,
    /// The resulting table.
    pub table: Table,
    /// Number of lines in the decoded input.
    pub lines_read: usize,
    /// Lines dropped by the file filter.
    pub skipped: usize,
}

/// Split decoded text into lines on `\n`, `\r\n` or a lone `\r`.
///
/// A trailing terminator does not produce an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(idx) => {
                lines.push(&rest[..idx]);
                let skip = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[idx + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }

    lines
}

/// Parse every line (trimmed) and build the table from the retained records.
pub fn tabulate_lines<'a, I>(lines: I, filter_files: bool, style: PathStyle) -> Table
where
    I: IntoIterator<Item = &'a str>,
{
    let records: Vec<_> = lines
        .into_iter()
        .filter_map(|line| parse_line_as(line.trim(), filter_files, style))
        .collect();
    build_table(&records)
}

/// Decode `bytes` and tabulate the paths they contain.
///
/// Fails only when the bytes cannot be decoded; callers report that once and
/// carry on with [`Table::empty`].
pub fn tabulate_bytes(bytes: &[u8], opts: &TabulateOptions) -> PathTableResult<Tabulation> {
    let encoding = opts.encoding.unwrap_or_else(|| detect_encoding(bytes));
    debug!("decoding {} bytes as {}", bytes.len(), encoding.name());

    let text = decode(bytes, encoding).inspect_err(|e| warn!("{e}"))?;
    let lines = split_lines(&text);
    let lines_read = lines.len();

    let table = tabulate_lines(lines, opts.filter_files, opts.style);
    let skipped = lines_read - table.len();
    debug!(
        "tabulated {} of {} lines into {} folder levels",
        table.len(),
        lines_read,
        table.folder_levels()
    );

    Ok(Tabulation {
        encoding,
        table,
        lines_read,
        skipped,
    })
}

/// Read `path` and tabulate it.
pub fn tabulate_file(path: &Path, opts: &TabulateOptions) -> PathTableResult<Tabulation> {
    let bytes = std::fs::read(path).context(ReadInputSnafu {
        path: path.display().to_string(),
    })?;
    tabulate_bytes(&bytes, opts)
}
