//! Unit tests for the reconciliation engine and capture log.

use scribe_extract::{PatternRule, PatternSet};
use scribe_types::{Entry, EntryStatus, MutationBatch, SourceNode};

use crate::{ChatLog, Reconciler};

fn fixed_clock() -> String {
    "2026-08-05 12:00:00".to_string()
}

fn engine() -> Reconciler {
    Reconciler::with_clock(PatternSet::default(), fixed_clock)
}

fn entry(identifier: &str) -> Entry {
    Entry {
        identifier: identifier.to_string(),
        timestamp: fixed_clock(),
        author: "author".to_string(),
        message: "message".to_string(),
        status: EntryStatus::None,
    }
}

// ── ChatLog ──────────────────────────────────────────────────────────

#[test]
fn append_returns_consecutive_positions() {
    let mut log = ChatLog::new();
    assert_eq!(log.append(entry("a")), 0);
    assert_eq!(log.append(entry("b")), 1);
    assert_eq!(log.len(), 2);
}

#[test]
fn identifier_is_never_rebound() {
    let mut log = ChatLog::new();
    log.append(entry("a"));
    log.append(entry("a"));

    // Both entries exist, but the index still resolves to the first.
    assert_eq!(log.len(), 2);
    assert_eq!(log.find_by_identifier("a"), Some(0));
}

#[test]
fn empty_identifier_is_not_indexed() {
    let mut log = ChatLog::new();
    log.append(entry(""));
    assert_eq!(log.find_by_identifier(""), None);
}

#[test]
fn set_status_preserves_position_and_timestamp() {
    let mut log = ChatLog::new();
    let pos = log.append(entry("a"));

    assert!(log.set_status(pos, EntryStatus::Deleted));

    let e = log.get(pos).expect("entry should exist");
    assert_eq!(e.status, EntryStatus::Deleted);
    assert_eq!(e.timestamp, fixed_clock());
    assert_eq!(log.find_by_identifier("a"), Some(pos));
}

#[test]
fn set_status_out_of_range_is_refused() {
    let mut log = ChatLog::new();
    assert!(!log.set_status(0, EntryStatus::Deleted));
}

#[test]
fn clear_resets_sequence_and_index() {
    let mut log = ChatLog::new();
    log.append(entry("a"));
    log.clear();

    assert!(log.is_empty());
    assert_eq!(log.find_by_identifier("a"), None);
}

// ── Uniqueness ───────────────────────────────────────────────────────

#[test]
fn duplicate_adds_keep_first_seen_fields() {
    let mut engine = engine();
    engine.on_added(&SourceNode::content("m1", "Alice", "first text"));
    engine.on_added(&SourceNode::content("m1", "Alice", "edited text"));
    engine.on_added(&SourceNode::content("m1", "Someone Else", "other"));

    assert_eq!(engine.len(), 1);
    let e = engine.log().get(0).expect("entry should exist");
    assert_eq!(e.author, "Alice");
    assert_eq!(e.message, "first text");
}

#[test]
fn distinct_identifiers_all_append() {
    let mut engine = engine();
    engine.on_added(&SourceNode::content("m1", "Alice", "one"));
    engine.on_added(&SourceNode::content("m2", "Bob", "two"));
    engine.on_added(&SourceNode::content("m3", "Carol", "three"));
    assert_eq!(engine.len(), 3);
}

#[test]
fn identifierless_content_is_append_only() {
    // Nodes without identifiers can never be deduplicated.
    let mut engine = engine();
    engine.on_added(&SourceNode::content("", "Alice", "hello"));
    engine.on_added(&SourceNode::content("", "Alice", "hello"));
    assert_eq!(engine.len(), 2);
}

// ── Deletion ─────────────────────────────────────────────────────────

#[test]
fn deletion_after_sighting_mutates_in_place() {
    let mut engine = engine();
    engine.on_added(&SourceNode::content("m1", "Alice", "doomed"));
    engine.on_added(&SourceNode::content("m2", "Bob", "fine"));

    engine.on_removed(&SourceNode::content("m1", "Alice", "doomed"));

    assert_eq!(engine.len(), 2, "removal of a seen message must not append");
    let e = engine.log().get(0).expect("entry should exist");
    assert_eq!(e.status, EntryStatus::Deleted);
    assert_eq!(e.timestamp, fixed_clock());
    assert_eq!(e.message, "doomed");

    let other = engine.log().get(1).expect("entry should exist");
    assert_eq!(other.status, EntryStatus::None);
}

#[test]
fn deletion_without_prior_sighting_appends_record() {
    let mut engine = engine();
    engine.on_removed(&SourceNode::content("ghost", "Eve", "never seen"));

    assert_eq!(engine.len(), 1);
    let e = engine.log().get(0).expect("entry should exist");
    assert_eq!(e.status, EntryStatus::Deleted);
    assert_eq!(e.author, "Eve");
    assert_eq!(e.identifier, "ghost");
}

#[test]
fn add_after_unseen_deletion_is_a_no_op() {
    // The removal record claimed the identifier; a late add notification
    // for the same message must not duplicate it.
    let mut engine = engine();
    engine.on_removed(&SourceNode::content("ghost", "Eve", "fast delete"));
    engine.on_added(&SourceNode::content("ghost", "Eve", "fast delete"));

    assert_eq!(engine.len(), 1);
    assert_eq!(
        engine.log().get(0).expect("entry").status,
        EntryStatus::Deleted
    );
}

#[test]
fn identifierless_removal_always_appends() {
    let mut engine = engine();
    engine.on_added(&SourceNode::content("", "Alice", "kept"));
    engine.on_removed(&SourceNode::content("", "Alice", "kept"));

    // No identifier to reconcile on: the removal is a fresh record.
    assert_eq!(engine.len(), 2);
    assert_eq!(engine.log().get(0).expect("entry").status, EntryStatus::None);
    assert_eq!(
        engine.log().get(1).expect("entry").status,
        EntryStatus::Deleted
    );
}

// ── Empty-content discard ────────────────────────────────────────────

#[test]
fn empty_content_never_changes_length() {
    let mut engine = engine();
    let placeholder = SourceNode::content("ph-1", "", "  ");

    engine.on_added(&placeholder);
    assert_eq!(engine.len(), 0);

    engine.on_removed(&placeholder);
    assert_eq!(engine.len(), 0);
}

// ── Moderation notices ───────────────────────────────────────────────

#[test]
fn moderation_notices_are_never_deduplicated() {
    let mut engine = engine();
    engine.on_added(&SourceNode::system("Alice was timed out for 10 minutes"));
    engine.on_added(&SourceNode::system("Alice was timed out for 10 minutes"));

    assert_eq!(engine.len(), 2);
    for pos in 0..2 {
        let e = engine.log().get(pos).expect("entry should exist");
        assert_eq!(e.status, EntryStatus::Timeout("10 minutes".to_string()));
        assert_eq!(e.author, "Alice");
        assert_eq!(e.identifier, "");
    }
}

#[test]
fn swapped_pattern_table_drives_reconciliation() {
    let localized = PatternSet::new(vec![
        PatternRule::ban(r"^(?P<name>.+?) foi banido$").expect("ban rule"),
    ]);
    let mut engine = Reconciler::with_clock(localized, fixed_clock);

    // The built-in English phrasing no longer matches; the new one does.
    engine.on_added(&SourceNode::system("Bob has been removed"));
    engine.on_added(&SourceNode::system("Roberto foi banido"));

    assert_eq!(engine.len(), 1);
    let e = engine.log().get(0).expect("entry should exist");
    assert_eq!(e.author, "Roberto");
    assert_eq!(e.status, EntryStatus::Banned);
}

#[test]
fn unmatched_system_text_is_discarded() {
    let mut engine = engine();
    engine.on_added(&SourceNode::system("stream starting soon"));
    assert_eq!(engine.len(), 0);
}

#[test]
fn ban_notice_records_banned_status() {
    let mut engine = engine();
    engine.on_added(&SourceNode::system("Bob has been removed"));

    let e = engine.log().get(0).expect("entry should exist");
    assert_eq!(e.status, EntryStatus::Banned);
    assert_eq!(e.author, "Bob");
    assert_eq!(e.message, "Bob has been removed");
}

// ── Clear ────────────────────────────────────────────────────────────

#[test]
fn clear_allows_fresh_capture_of_old_identifier() {
    let mut engine = engine();
    engine.on_added(&SourceNode::content("m1", "Alice", "before"));
    engine.clear();

    assert_eq!(engine.len(), 0);
    assert_eq!(engine.log().find_by_identifier("m1"), None);

    engine.on_added(&SourceNode::content("m1", "Alice", "after"));
    assert_eq!(engine.len(), 1);
    assert_eq!(engine.log().get(0).expect("entry").message, "after");
}

// ── Batches & counter ────────────────────────────────────────────────

#[test]
fn apply_processes_additions_then_removals() {
    let mut engine = engine();
    let batch = MutationBatch {
        added: vec![SourceNode::content("m1", "Alice", "hi")],
        removed: vec![SourceNode::content("m1", "Alice", "hi")],
    };
    engine.apply(&batch);

    assert_eq!(engine.len(), 1);
    assert_eq!(
        engine.log().get(0).expect("entry").status,
        EntryStatus::Deleted
    );
}

#[test]
fn counter_tracks_every_mutation() {
    let mut engine = engine();
    let count = engine.count();
    assert_eq!(*count.borrow(), 0);

    engine.on_added(&SourceNode::content("m1", "Alice", "hi"));
    assert_eq!(*count.borrow(), 1);

    engine.on_removed(&SourceNode::content("ghost", "Eve", "gone"));
    assert_eq!(*count.borrow(), 2);

    // In-place mutation republishes the unchanged length.
    engine.on_removed(&SourceNode::content("m1", "Alice", "hi"));
    assert_eq!(*count.borrow(), 2);

    engine.clear();
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn snapshot_is_detached_from_the_log() {
    let mut engine = engine();
    engine.on_added(&SourceNode::content("m1", "Alice", "hi"));

    let snapshot = engine.snapshot();
    engine.on_added(&SourceNode::content("m2", "Bob", "later"));

    assert_eq!(snapshot.len(), 1);
    assert_eq!(engine.len(), 2);
}
