//! The append-only capture log and its identifier index.

use std::collections::HashMap;

use scribe_types::{Entry, EntryStatus};

/// Ordered sequence of captured entries plus an identifier → position map.
///
/// Insertion order is capture order and is never changed: entries are only
/// appended or mutated in place (status field only). An identifier, once
/// registered, is never rebound to a different position — lookups always
/// resolve to the first entry that carried it.
#[derive(Debug, Default)]
pub struct ChatLog {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl ChatLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns its position.
    ///
    /// A non-empty identifier not yet in the index is registered at the
    /// new position; an identifier already present keeps its original
    /// binding (first-seen wins).
    pub fn append(&mut self, entry: Entry) -> usize {
        let position = self.entries.len();
        if !entry.identifier.is_empty() {
            self.index
                .entry(entry.identifier.clone())
                .or_insert(position);
        }
        self.entries.push(entry);
        position
    }

    /// Returns the entry at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&Entry> {
        self.entries.get(position)
    }

    /// Returns the position bound to `identifier`, if registered.
    pub fn find_by_identifier(&self, identifier: &str) -> Option<usize> {
        self.index.get(identifier).copied()
    }

    /// Sets the status of the entry at `position` in place.
    ///
    /// Position and original timestamp are untouched. Returns `false` if
    /// the position is out of range.
    pub fn set_status(&mut self, position: usize, status: EntryStatus) -> bool {
        match self.entries.get_mut(position) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }

    /// Returns the entries as a read-only slice, in capture order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns an owned copy of the log for exporters.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    /// Number of captured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empties the sequence and the index together.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}
