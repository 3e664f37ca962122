//! Core of `path-table`: turn a listing of filesystem paths into a table.
//!
//! The crate provides:
//!
//! - Best-effort encoding detection and strict decoding of the raw listing
//!   (`encoding` module).
//! - Per-line decomposition into drive, folder levels and file name, with
//!   Windows or POSIX path rules (`record` module).
//! - A rectangular table whose folder columns follow the deepest path seen
//!   (`table` module).
//! - UTF-8 (with BOM) CSV export (`export` module).
//! - The end-to-end pipeline tying these together (`pipeline` module).
//!
//! Front ends such as the `pathtab` CLI depend on this crate rather than
//! re-implementing the parsing rules.
#![deny(missing_docs)]
pub mod encoding;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod record;
pub mod table;

pub use error::{PathTableError, PathTableResult};
pub use export::{DEFAULT_EXPORT_FILE, export_csv, read_csv, write_csv};
pub use pipeline::{TabulateOptions, Tabulation, split_lines, tabulate_bytes, tabulate_file};
pub use record::{NO_DRIVE, PathRecord, PathStyle, parse_line, parse_line_as};
pub use table::{Table, build_table};
