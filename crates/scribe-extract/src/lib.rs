//! Identity extraction for raw event-source nodes.
//!
//! Given one [`SourceNode`], extraction produces either a [`ContentDraft`]
//! (identifier, author, message) or a [`ModerationDraft`] (a recognised
//! moderation notice), or nothing at all. Extraction is a pure function:
//! it never touches the capture log and has no side effects beyond
//! trace-level logging of discards.
//!
//! Moderation notices are matched against a [`PatternSet`], an ordered,
//! swappable table of regex rules. The built-in table recognises timeouts
//! (`"<name> was timed out for <count> <unit>"`) and bans (`"<name> has
//! been removed"` / `"<name> was banned"`); notice text matching no rule
//! is silently discarded, since not every system message is
//! moderation-relevant.

mod patterns;

pub use patterns::{PatternError, PatternRule, PatternSet};

use scribe_types::{EntryStatus, NodeKind, SourceNode};

/// Result of extracting one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    /// A regular chat message.
    Content(ContentDraft),
    /// A recognised moderation notice.
    Moderation(ModerationDraft),
}

/// Fields extracted from a content node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDraft {
    /// Source identifier; empty when the node carried none.
    pub identifier: String,
    /// Author display name, trimmed; possibly empty.
    pub author: String,
    /// Message text, trimmed; possibly empty.
    pub message: String,
}

/// Fields extracted from a recognised moderation notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationDraft {
    /// Name of the moderated user as captured by the matching rule.
    pub name: String,
    /// The status the notice implies.
    pub status: EntryStatus,
    /// The raw notice text, trimmed.
    pub notice: String,
}

/// Extracts a node according to its kind.
///
/// Returns `None` for structural placeholders (content nodes with neither
/// author nor message) and for system notices matching no pattern.
pub fn extract(node: &SourceNode, patterns: &PatternSet) -> Option<Draft> {
    match node.kind {
        NodeKind::Content => extract_content(node).map(Draft::Content),
        NodeKind::System => extract_system(node, patterns).map(Draft::Moderation),
    }
}

/// Extracts a node as a content message, regardless of its kind.
///
/// Remove notifications are assumed to concern content nodes, so removal
/// handling calls this directly. Missing sub-structure reads as empty;
/// a node with no author and no message yields `None`.
pub fn extract_content(node: &SourceNode) -> Option<ContentDraft> {
    let identifier = node.identifier.as_deref().unwrap_or("").to_string();
    let author = node.author.as_deref().unwrap_or("").trim().to_string();
    let message = node.message.as_deref().unwrap_or("").trim().to_string();

    if author.is_empty() && message.is_empty() {
        tracing::trace!(%identifier, "discarding placeholder node without content");
        return None;
    }

    Some(ContentDraft {
        identifier,
        author,
        message,
    })
}

/// Extracts a node as a moderation notice.
///
/// The raw text is matched against the pattern table in rule order; the
/// first matching rule wins. Unmatched text yields `None`.
pub fn extract_system(node: &SourceNode, patterns: &PatternSet) -> Option<ModerationDraft> {
    let text = node.text.as_deref().unwrap_or("").trim();
    if text.is_empty() {
        return None;
    }

    let draft = patterns.match_text(text);
    if draft.is_none() {
        tracing::trace!(text, "discarding system notice matching no pattern");
    }
    draft
}
