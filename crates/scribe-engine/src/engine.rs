//! The reconciliation engine: sole writer to the capture log.

use chrono::Local;
use scribe_extract::{extract, extract_content, Draft, PatternSet};
use scribe_types::{Entry, EntryStatus, MutationBatch, SourceNode};
use tokio::sync::watch;

use crate::log::ChatLog;

/// Returns the current local wall clock as `YYYY-MM-DD HH:MM:SS`.
pub fn local_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Applies event-source notifications to the capture log.
///
/// All mutations happen synchronously inside the handler methods; callers
/// must not interleave other log access between extraction and mutation,
/// which holding `&mut self` already guarantees.
pub struct Reconciler {
    log: ChatLog,
    patterns: PatternSet,
    clock: fn() -> String,
    count_tx: watch::Sender<usize>,
}

impl Reconciler {
    /// Creates an engine with an empty log and the given pattern table.
    pub fn new(patterns: PatternSet) -> Self {
        Self::with_clock(patterns, local_timestamp)
    }

    /// Creates an engine with an injected clock. Tests use a fixed clock
    /// to assert timestamp preservation.
    pub fn with_clock(patterns: PatternSet, clock: fn() -> String) -> Self {
        let (count_tx, _) = watch::channel(0);
        Self {
            log: ChatLog::new(),
            patterns,
            clock,
            count_tx,
        }
    }

    /// Subscribes to the live entry count, published on every mutation.
    pub fn count(&self) -> watch::Receiver<usize> {
        self.count_tx.subscribe()
    }

    /// Handles a node that appeared in the observed container.
    pub fn on_added(&mut self, node: &SourceNode) {
        let Some(draft) = extract(node, &self.patterns) else {
            return;
        };

        match draft {
            Draft::Moderation(m) => {
                // Moderation notices are distinct events even when the
                // text repeats, so they bypass the identifier index.
                tracing::info!(name = %m.name, status = %m.status, "moderation notice");
                self.log.append(Entry {
                    identifier: String::new(),
                    timestamp: (self.clock)(),
                    author: m.name,
                    message: m.notice,
                    status: m.status,
                });
            }
            Draft::Content(c) => {
                if !c.identifier.is_empty()
                    && self.log.find_by_identifier(&c.identifier).is_some()
                {
                    tracing::trace!(identifier = %c.identifier, "duplicate add notification");
                    return;
                }
                tracing::debug!(identifier = %c.identifier, author = %c.author, "captured message");
                self.log.append(Entry {
                    identifier: c.identifier,
                    timestamp: (self.clock)(),
                    author: c.author,
                    message: c.message,
                    status: EntryStatus::None,
                });
            }
        }

        self.publish_count();
    }

    /// Handles a node that disappeared from the observed container.
    pub fn on_removed(&mut self, node: &SourceNode) {
        let Some(draft) = extract_content(node) else {
            return;
        };

        if !draft.identifier.is_empty() {
            if let Some(position) = self.log.find_by_identifier(&draft.identifier) {
                tracing::info!(identifier = %draft.identifier, "message deleted after capture");
                self.log.set_status(position, EntryStatus::Deleted);
                self.publish_count();
                return;
            }
        }

        // The message vanished before its add notification was observed;
        // it still gets a record, stamped with the removal time.
        tracing::info!(identifier = %draft.identifier, author = %draft.author, "message deleted before capture");
        self.log.append(Entry {
            identifier: draft.identifier,
            timestamp: (self.clock)(),
            author: draft.author,
            message: draft.message,
            status: EntryStatus::Deleted,
        });
        self.publish_count();
    }

    /// Applies one delivery batch: all additions, then all removals, in
    /// batch order.
    pub fn apply(&mut self, batch: &MutationBatch) {
        for node in &batch.added {
            self.on_added(node);
        }
        for node in &batch.removed {
            self.on_removed(node);
        }
    }

    /// Empties the log and the identifier index together.
    pub fn clear(&mut self) {
        tracing::info!(discarded = self.log.len(), "clearing capture log");
        self.log.clear();
        self.publish_count();
    }

    /// Read access to the log.
    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    /// Owned copy of the log for exporters.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.log.snapshot()
    }

    /// Number of captured entries.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// True when nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    fn publish_count(&self) {
        self.count_tx.send_replace(self.log.len());
    }
}
