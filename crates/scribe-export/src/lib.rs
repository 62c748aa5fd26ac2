//! Export of a capture-log snapshot to tabular documents.
//!
//! Both export forms are pure transforms over a `&[Entry]` snapshot:
//!
//! - the simple CSV (`time, name, message, delete?`), byte-compatible
//!   with the columns downstream tooling already ingests;
//! - the richer [`Workbook`]: a `Chat` sheet (`TIME, USER, MESSAGE,
//!   STATUS, MOD ACTION`), a `Banned` sheet with only the banned
//!   entries, and a one-row `Session` sheet carrying the originating
//!   session's address.
//!
//! Column order is a contract; changing it breaks downstream consumers.

mod csv;
mod workbook;

pub use csv::{csv_bytes, write_csv_file, CsvOptions};
pub use workbook::{build_workbook, Sheet, Workbook};

/// Errors that can occur while writing export files.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The output file could not be written.
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}
