//! The reconciliation core: the capture log and its sole writer.
//!
//! [`ChatLog`] is an append-only ordered sequence of entries plus an
//! identifier index; [`Reconciler`] applies event-source notifications as
//! state transitions on it:
//!
//! | Notification | Known identifier | Outcome |
//! |--------------|------------------|---------|
//! | add (content) | no | append, register identifier |
//! | add (content) | yes | no-op (duplicate notification) |
//! | add (system notice) | — | append, never deduplicated |
//! | remove | yes | status set to `Deleted` in place |
//! | remove | no / none | append a fresh `Deleted` entry |
//!
//! Entries are never removed or reordered; the store is cleared only by an
//! explicit [`Reconciler::clear`]. Every mutation publishes the current
//! entry count on a watch channel for live display.

mod engine;
mod log;

pub use engine::{local_timestamp, Reconciler};
pub use log::ChatLog;

#[cfg(test)]
mod tests;
