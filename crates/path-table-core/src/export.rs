//! CSV export of a [`Table`].
//!
//! Exports are UTF-8 with a byte-order mark so spreadsheet tools pick the
//! right encoding. `None` cells are written as empty fields, and
//! [`read_csv`] maps them back.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use log::debug;
use snafu::ResultExt;

use crate::{
    error::{CsvSnafu, PathTableResult, WriteExportSnafu},
    table::{Cell, Table},
};

/// File name used when no export path is given.
pub const DEFAULT_EXPORT_FILE: &str = "processed_paths.csv";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write `table` as BOM-prefixed CSV to `out`.
pub fn write_csv<W: Write>(table: &Table, mut out: W) -> PathTableResult<()> {
    out.write_all(UTF8_BOM)
        .map_err(csv::Error::from)
        .context(CsvSnafu)?;

    if table.columns().is_empty() {
        return out.flush().map_err(csv::Error::from).context(CsvSnafu);
    }

    let mut writer = csv::WriterBuilder::new().from_writer(out);
    writer.write_record(table.columns()).context(CsvSnafu)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))
            .context(CsvSnafu)?;
    }
    writer.flush().map_err(csv::Error::from).context(CsvSnafu)?;
    Ok(())
}

/// Create (or overwrite) `path` and write `table` to it.
pub fn export_csv(table: &Table, path: &Path) -> PathTableResult<()> {
    let file = File::create(path).context(WriteExportSnafu {
        path: path.display().to_string(),
    })?;

    write_csv(table, BufWriter::new(file))?;
    debug!("exported {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Read a CSV produced by [`write_csv`] back into a table.
pub fn read_csv<R: Read>(mut input: R) -> PathTableResult<Table> {
    let mut raw = Vec::new();
    input
        .read_to_end(&mut raw)
        .map_err(csv::Error::from)
        .context(CsvSnafu)?;
    let body = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);

    if body.is_empty() {
        return Ok(Table::empty());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body);

    let columns: Vec<String> = reader
        .headers()
        .context(CsvSnafu)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context(CsvSnafu)?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| (!field.is_empty()).then(|| field.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(Table::from_parts(columns, rows))
}
