//! Shared types for the scribe capture pipeline.
//!
//! This crate provides the foundational types used across all scribe crates:
//! the captured log [`Entry`] and its moderation [`EntryStatus`], plus the
//! raw [`SourceNode`] / [`MutationBatch`] shapes delivered by an event
//! source.
//!
//! No crate in the workspace depends on anything *except* `scribe-types`
//! for cross-cutting type definitions. This keeps the dependency graph
//! clean and prevents circular dependencies.

use serde::{Deserialize, Serialize};

/// Moderation status of a captured log entry.
///
/// A freshly captured message has status [`EntryStatus::None`]. The status
/// is the only field of an entry that may change after capture, and only
/// ever from `None` to one of the moderation variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    /// No moderation action recorded.
    #[default]
    None,
    /// The message was removed after (or without) being seen.
    Deleted,
    /// The author was timed out; the payload is the human-readable
    /// duration as it appeared in the notice (e.g. `"10 minutes"`).
    Timeout(String),
    /// The author was banned or removed from the room.
    Banned,
}

impl EntryStatus {
    /// Returns the canonical label used in exports and logs.
    ///
    /// `None` maps to the empty string so that unmoderated rows render
    /// with a blank status column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Deleted => "deleted",
            Self::Timeout(_) => "timeout",
            Self::Banned => "banned",
        }
    }

    /// True for any status other than [`EntryStatus::None`].
    pub fn is_moderated(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One logical chat event in the capture log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Source-assigned opaque identifier; empty string means the source
    /// assigned none (system notices never carry one). Entries with an
    /// empty identifier are immutable after creation.
    pub identifier: String,
    /// Capture-time wall clock, local time zone, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Display name of the author, possibly empty.
    pub author: String,
    /// Message text, possibly empty.
    pub message: String,
    /// Moderation status; the only field mutated after capture.
    pub status: EntryStatus,
}

/// Discriminator for the two node shapes an event source reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A regular chat message node.
    #[default]
    Content,
    /// A system/moderation notice node.
    System,
}

/// One raw node reported by the event source.
///
/// The source adapter is responsible for resolving the node's
/// sub-structure (picking the first name-capable sub-element and the
/// message sub-element); this struct carries the resolved fields. Missing
/// sub-structure is represented by `None` and treated as empty downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceNode {
    /// Identifier attribute, if the node carries one.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Node shape discriminator.
    #[serde(default)]
    pub kind: NodeKind,
    /// Author display name sub-field.
    #[serde(default)]
    pub author: Option<String>,
    /// Message text sub-field.
    #[serde(default)]
    pub message: Option<String>,
    /// Raw notice text; only meaningful for [`NodeKind::System`] nodes.
    #[serde(default)]
    pub text: Option<String>,
}

impl SourceNode {
    /// Builds a content node with the given identifier, author and message.
    pub fn content(identifier: &str, author: &str, message: &str) -> Self {
        Self {
            identifier: Some(identifier.to_string()),
            kind: NodeKind::Content,
            author: Some(author.to_string()),
            message: Some(message.to_string()),
            text: None,
        }
    }

    /// Builds a system notice node carrying the given raw text.
    pub fn system(text: &str) -> Self {
        Self {
            identifier: None,
            kind: NodeKind::System,
            author: None,
            message: None,
            text: Some(text.to_string()),
        }
    }
}

/// One unit of delivery from the event source: the nodes that appeared
/// and the nodes that disappeared since the previous batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationBatch {
    /// Nodes inserted into the observed container.
    #[serde(default)]
    pub added: Vec<SourceNode>,
    /// Nodes removed from the observed container.
    #[serde(default)]
    pub removed: Vec<SourceNode>,
}

impl MutationBatch {
    /// True when the batch carries no nodes in either direction.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
