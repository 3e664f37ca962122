//! Decomposition of a single path line into drive, folders and file name.
//!
//! Whether the last segment is a file is decided purely by the presence of a
//! `.` in it. Directories with dots in their name are therefore reported as
//! files; that heuristic is kept as is.

use std::fmt;

/// Drive cell used when a path carries no drive or volume prefix.
pub const NO_DRIVE: &str = "No Drive";

/// Which drive syntax and separators to apply when splitting a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStyle {
    /// `X:` and UNC (`\\server\share`) drives; both `\` and `/` separate segments.
    #[default]
    Windows,
    /// No drives; only `/` separates segments.
    Posix,
}

impl PathStyle {
    fn is_separator(self, ch: char) -> bool {
        match self {
            PathStyle::Windows => ch == '\\' || ch == '/',
            PathStyle::Posix => ch == '/',
        }
    }

    /// Split `path` into its drive prefix and the remainder.
    ///
    /// The drive is empty when the path has none. The remainder keeps its
    /// leading separator, if any.
    pub fn split_drive(self, path: &str) -> (&str, &str) {
        match self {
            PathStyle::Posix => ("", path),
            PathStyle::Windows => split_windows_drive(path),
        }
    }
}

impl fmt::Display for PathStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStyle::Windows => f.write_str("windows"),
            PathStyle::Posix => f.write_str("posix"),
        }
    }
}

fn split_windows_drive(path: &str) -> (&str, &str) {
    let is_sep = |ch: char| ch == '\\' || ch == '/';
    let mut chars = path.chars();

    match (chars.next(), chars.next()) {
        // UNC: \\server\share
        (Some(a), Some(b)) if is_sep(a) && is_sep(b) => {
            let after_prefix = 2;
            let Some(server_len) = path[after_prefix..].find(is_sep) else {
                return (path, "");
            };
            let share_start = after_prefix + server_len + 1;
            match path[share_start..].find(is_sep) {
                Some(share_len) => path.split_at(share_start + share_len),
                None => (path, ""),
            }
        }
        (Some(letter), Some(':')) => path.split_at(letter.len_utf8() + 1),
        _ => ("", path),
    }
}

/// One input line split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRecord {
    /// Drive or volume prefix, or [`NO_DRIVE`].
    pub drive: String,
    /// Directory segments from the root outward.
    pub folders: Vec<String>,
    /// Final segment, present only when it contains a `.`.
    pub file_name: Option<String>,
}

impl PathRecord {
    /// Decompose `line` without any filtering.
    ///
    /// Never fails: degenerate input yields a record with no folders and no
    /// file name.
    pub fn parse(line: &str, style: PathStyle) -> Self {
        let (drive, tail) = style.split_drive(line);
        let mut segments: Vec<String> = tail
            .split(|ch: char| style.is_separator(ch))
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        let file_name = match segments.last() {
            Some(last) if last.contains('.') => segments.pop(),
            _ => None,
        };

        PathRecord {
            drive: if drive.is_empty() {
                NO_DRIVE.to_string()
            } else {
                drive.to_string()
            },
            folders: segments,
            file_name,
        }
    }

    /// Number of folder levels this record occupies.
    pub fn depth(&self) -> usize {
        self.folders.len()
    }

    /// True when the record resolved to a file name.
    pub fn has_file(&self) -> bool {
        self.file_name.is_some()
    }
}

/// Parse `line` with the default (Windows) path style.
///
/// Returns `None` when `filter_files` is set and the line does not end in a
/// segment containing a `.`.
pub fn parse_line(line: &str, filter_files: bool) -> Option<PathRecord> {
    parse_line_as(line, filter_files, PathStyle::default())
}

/// Like [`parse_line`], with an explicit path style.
pub fn parse_line_as(line: &str, filter_files: bool, style: PathStyle) -> Option<PathRecord> {
    let record = PathRecord::parse(line, style);
    if filter_files && !record.has_file() {
        return None;
    }
    Some(record)
}
