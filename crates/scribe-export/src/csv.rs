//! The simple CSV form: `time, name, message, delete?`.

use std::path::Path;

use scribe_types::Entry;

use crate::ExportError;

/// UTF-8 byte-order mark, prepended so spreadsheet applications detect
/// the encoding.
const BOM: &[u8] = b"\xef\xbb\xbf";

/// Rendering options for CSV output.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter. Some locales expect `;` for spreadsheet import.
    pub delimiter: char,
    /// Whether to prepend a UTF-8 BOM.
    pub bom: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            bom: true,
        }
    }
}

/// Quotes a field, doubling embedded quotes.
pub(crate) fn escape(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Renders one row from already-escaped cells.
pub(crate) fn render_rows(rows: &[Vec<String>], options: &CsvOptions) -> Vec<u8> {
    let delimiter = options.delimiter.to_string();
    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| escape(cell))
                .collect::<Vec<_>>()
                .join(&delimiter)
        })
        .collect();

    let mut bytes = Vec::new();
    if options.bom {
        bytes.extend_from_slice(BOM);
    }
    bytes.extend_from_slice(lines.join("\r\n").as_bytes());
    bytes
}

/// Renders the simple CSV form of a snapshot.
///
/// The `delete?` column is `yes` for any moderated entry and empty
/// otherwise.
pub fn csv_bytes(entries: &[Entry], options: &CsvOptions) -> Vec<u8> {
    let mut rows = Vec::with_capacity(entries.len() + 1);
    rows.push(vec![
        "time".to_string(),
        "name".to_string(),
        "message".to_string(),
        "delete?".to_string(),
    ]);
    for entry in entries {
        rows.push(vec![
            entry.timestamp.clone(),
            entry.author.clone(),
            entry.message.clone(),
            if entry.status.is_moderated() {
                "yes".to_string()
            } else {
                String::new()
            },
        ]);
    }
    render_rows(&rows, options)
}

/// Writes the simple CSV form to `path`.
pub fn write_csv_file(
    path: &Path,
    entries: &[Entry],
    options: &CsvOptions,
) -> Result<(), ExportError> {
    std::fs::write(path, csv_bytes(entries, options))?;
    Ok(())
}
