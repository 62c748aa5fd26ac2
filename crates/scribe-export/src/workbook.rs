//! The rich export form: a multi-sheet tabular workbook.

use scribe_types::{Entry, EntryStatus};

use crate::csv::{render_rows, CsvOptions};

/// Column headers of the `Chat` and `Banned` sheets, in contract order.
const CHAT_COLUMNS: [&str; 5] = ["TIME", "USER", "MESSAGE", "STATUS", "MOD ACTION"];

/// One sheet of a workbook: a header row plus data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    name: String,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Sheet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header cells, in contract order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows (header excluded).
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Renders this sheet as CSV bytes.
    pub fn to_csv(&self, options: &CsvOptions) -> Vec<u8> {
        let mut all = Vec::with_capacity(self.rows.len() + 1);
        all.push(self.header.clone());
        all.extend(self.rows.iter().cloned());
        render_rows(&all, options)
    }
}

/// The rich export document: `Chat`, `Banned` and `Session` sheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// All sheets, in document order.
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Looks a sheet up by name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// The free-text detail shown in the `MOD ACTION` column.
fn mod_action(status: &EntryStatus) -> String {
    match status {
        EntryStatus::Timeout(duration) => duration.clone(),
        _ => String::new(),
    }
}

fn chat_row(entry: &Entry) -> Vec<String> {
    vec![
        entry.timestamp.clone(),
        entry.author.clone(),
        entry.message.clone(),
        entry.status.label().to_string(),
        mod_action(&entry.status),
    ]
}

/// Builds the rich workbook from a snapshot.
///
/// The `Chat` sheet carries every entry in capture order, `Banned` only
/// the entries with status `banned`, and `Session` a single row with the
/// originating session's address.
pub fn build_workbook(entries: &[Entry], session_url: &str) -> Workbook {
    let mut chat = Sheet::new("Chat", &CHAT_COLUMNS);
    chat.rows = entries.iter().map(chat_row).collect();

    let mut banned = Sheet::new("Banned", &CHAT_COLUMNS);
    banned.rows = entries
        .iter()
        .filter(|e| e.status == EntryStatus::Banned)
        .map(chat_row)
        .collect();

    let mut session = Sheet::new("Session", &["URL"]);
    session.rows = vec![vec![session_url.to_string()]];

    Workbook {
        sheets: vec![chat, banned, session],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(author: &str, status: EntryStatus) -> Entry {
        Entry {
            identifier: String::new(),
            timestamp: "2026-08-05 12:00:00".to_string(),
            author: author.to_string(),
            message: format!("{author} says something"),
            status,
        }
    }

    #[test]
    fn chat_sheet_carries_all_entries_in_order() {
        let entries = vec![
            entry("Alice", EntryStatus::None),
            entry("Bob", EntryStatus::Banned),
            entry("Carol", EntryStatus::Deleted),
        ];
        let workbook = build_workbook(&entries, "https://chat.example/live/abc");

        let chat = workbook.sheet("Chat").expect("chat sheet");
        assert_eq!(chat.header(), &CHAT_COLUMNS[..]);
        assert_eq!(chat.rows().len(), 3);
        assert_eq!(chat.rows()[0][1], "Alice");
        assert_eq!(chat.rows()[1][1], "Bob");
        assert_eq!(chat.rows()[2][1], "Carol");
    }

    #[test]
    fn banned_sheet_filters_to_banned_entries_only() {
        let entries = vec![
            entry("Alice", EntryStatus::None),
            entry("Bob", EntryStatus::Banned),
            entry("Carol", EntryStatus::Deleted),
            entry("Dave", EntryStatus::Banned),
        ];
        let workbook = build_workbook(&entries, "");

        let banned = workbook.sheet("Banned").expect("banned sheet");
        assert_eq!(banned.rows().len(), 2);
        assert_eq!(banned.rows()[0][1], "Bob");
        assert_eq!(banned.rows()[1][1], "Dave");
        assert_eq!(banned.header(), workbook.sheet("Chat").expect("chat").header());
    }

    #[test]
    fn status_and_mod_action_columns() {
        let entries = vec![
            entry("Alice", EntryStatus::None),
            entry("Bob", EntryStatus::Timeout("10 minutes".to_string())),
            entry("Carol", EntryStatus::Banned),
        ];
        let workbook = build_workbook(&entries, "");
        let chat = workbook.sheet("Chat").expect("chat sheet");

        assert_eq!(chat.rows()[0][3], "");
        assert_eq!(chat.rows()[0][4], "");
        assert_eq!(chat.rows()[1][3], "timeout");
        assert_eq!(chat.rows()[1][4], "10 minutes");
        assert_eq!(chat.rows()[2][3], "banned");
        assert_eq!(chat.rows()[2][4], "");
    }

    #[test]
    fn session_sheet_carries_the_address() {
        let workbook = build_workbook(&[], "https://chat.example/live/abc");
        let session = workbook.sheet("Session").expect("session sheet");

        assert_eq!(session.header(), &["URL"][..]);
        assert_eq!(session.rows(), &[vec!["https://chat.example/live/abc".to_string()]][..]);
    }

    #[test]
    fn sheet_renders_as_csv() {
        let entries = vec![entry("Alice", EntryStatus::None)];
        let workbook = build_workbook(&entries, "");
        let options = CsvOptions {
            delimiter: ',',
            bom: false,
        };

        let text = String::from_utf8(workbook.sheet("Chat").expect("chat").to_csv(&options))
            .expect("utf-8");
        assert!(text.starts_with(r#""TIME","USER","MESSAGE","STATUS","MOD ACTION""#));
    }
}
