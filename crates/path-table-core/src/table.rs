//! Rectangular table built from parsed path records.
//!
//! Building is two-pass: the column count depends on the deepest record, so
//! all records are seen before the first row is laid out.

use crate::record::PathRecord;

/// Header of the drive column.
pub const DRIVE_COLUMN: &str = "Drive";
/// Header of the file name column.
pub const FILE_NAME_COLUMN: &str = "File Name";

/// Header of the 1-based folder column `level`.
pub fn folder_column(level: usize) -> String {
    format!("Folder Level {level}")
}

/// A cell; `None` is the padding marker for absent folder levels and files.
pub type Cell = Option<String>;

/// Column headers plus rows of equal width.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Table with no columns and no rows, used when the input cannot be decoded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a table from headers and rows.
    ///
    /// Rows shorter than the header are padded with `None`; longer rows are
    /// truncated, so the table stays rectangular.
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Column headers in display order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows; every row has `columns().len()` cells.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of `Folder Level N` columns.
    pub fn folder_levels(&self) -> usize {
        self.columns.len().saturating_sub(2)
    }
}

/// Deepest path across `records`, counting the file-name slot.
///
/// The table gets `max_depth(records) - 1` folder columns.
pub fn max_depth(records: &[PathRecord]) -> usize {
    records.iter().map(PathRecord::depth).max().unwrap_or(0) + 1
}

/// Lay `records` out as a table with `Drive`, `Folder Level 1..` and `File Name`.
pub fn build_table(records: &[PathRecord]) -> Table {
    let folder_levels = max_depth(records) - 1;

    let mut columns = Vec::with_capacity(folder_levels + 2);
    columns.push(DRIVE_COLUMN.to_string());
    columns.extend((1..=folder_levels).map(folder_column));
    columns.push(FILE_NAME_COLUMN.to_string());

    let rows = records
        .iter()
        .map(|rec| {
            let mut row = Vec::with_capacity(columns.len());
            row.push(Some(rec.drive.clone()));
            row.extend(rec.folders.iter().cloned().map(Some));
            row.resize(1 + folder_levels, None);
            row.push(rec.file_name.clone());
            row
        })
        .collect();

    Table { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_line;

    fn cells(items: &[Option<&str>]) -> Vec<Cell> {
        items.iter().map(|c| c.map(str::to_string)).collect()
    }

    #[test]
    fn headers_follow_deepest_record() {
        let records = vec![
            parse_line(r"C:\Users\alice\doc.txt", false).unwrap(),
            parse_line("/var/log/syslog", false).unwrap(),
        ];
        let table = build_table(&records);

        assert_eq!(
            table.columns(),
            &[
                "Drive",
                "Folder Level 1",
                "Folder Level 2",
                "Folder Level 3",
                "File Name"
            ]
        );
        assert_eq!(
            table.rows()[0],
            cells(&[Some("C:"), Some("Users"), Some("alice"), None, Some("doc.txt")])
        );
        assert_eq!(
            table.rows()[1],
            cells(&[Some("No Drive"), Some("var"), Some("log"), Some("syslog"), None])
        );
    }

    #[test]
    fn single_file_path_gives_two_folder_columns() {
        let records = vec![parse_line(r"C:\Users\alice\doc.txt", false).unwrap()];
        let table = build_table(&records);
        assert_eq!(table.folder_levels(), 2);
        assert_eq!(
            table.rows()[0],
            cells(&[Some("C:"), Some("Users"), Some("alice"), Some("doc.txt")])
        );
    }

    #[test]
    fn drive_only_row_is_all_empty() {
        let records = vec![
            parse_line("E:", false).unwrap(),
            parse_line(r"E:\media\song.mp3", false).unwrap(),
        ];
        let table = build_table(&records);
        assert_eq!(max_depth(&records), 2);
        assert_eq!(table.rows()[0], cells(&[Some("E:"), None, None]));
    }

    #[test]
    fn no_records_still_have_drive_and_file_columns() {
        let table = build_table(&[]);
        assert_eq!(table.columns(), &["Drive", "File Name"]);
        assert!(table.is_empty());
        assert_eq!(table.folder_levels(), 0);
    }

    #[test]
    fn every_row_has_header_width() {
        let records: Vec<_> = ["", "a", r"a\b\c\d", r"x\y.z", "Q:"]
            .iter()
            .filter_map(|l| parse_line(l, false))
            .collect();
        let table = build_table(&records);
        for row in table.rows() {
            assert_eq!(row.len(), table.columns().len());
        }
    }

    #[test]
    fn from_parts_pads_short_rows() {
        let table = Table::from_parts(
            vec!["Drive".into(), "File Name".into()],
            vec![vec![Some("C:".into())]],
        );
        assert_eq!(table.rows()[0], vec![Some("C:".to_string()), None]);
    }
}
