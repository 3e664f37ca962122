//! Error types and SNAFU context selectors for `path-table-core`.
//!
//! Every fallible operation in the crate returns [`PathTableResult`]. Sibling
//! modules attach context through the crate-visible selectors so the messages
//! users see stay consistent.

use snafu::prelude::*;

/// Convenience alias for results produced by this crate.
pub type PathTableResult<T> = std::result::Result<T, PathTableError>;

/// Errors from reading, tabulating and exporting path listings.
///
/// Malformed path lines are never an error; the only failure inside the
/// tabulation itself is a whole-file decode failure.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PathTableError {
    /// The input bytes are not valid under the detected (or requested) encoding.
    #[snafu(display("Failed to decode file with detected encoding: {encoding}."))]
    Decode {
        /// Name of the encoding the decode was attempted with.
        encoding: String,
    },

    /// The caller asked for an encoding label that is not recognised.
    #[snafu(display("Unknown encoding label '{label}'"))]
    UnknownEncoding {
        /// The label as given by the caller.
        label: String,
    },

    /// The input listing could not be read.
    #[snafu(display("Input file not found or not readable: {path}"))]
    ReadInput {
        /// Path of the input listing.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The CSV export file could not be created or written.
    #[snafu(display("Failed to write CSV export: {path}"))]
    WriteExport {
        /// Path of the export file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serializing or parsing CSV failed.
    #[snafu(display("CSV error: {source}"))]
    Csv {
        /// Underlying CSV error.
        source: csv::Error,
    },
}

impl PathTableError {
    /// True when the error is the whole-file decode failure, which callers
    /// report and then continue with an empty table.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, PathTableError::Decode { .. })
    }
}
