//! The swappable moderation-notice pattern table.
//!
//! Notice text varies with the chat platform's UI language, so the rules
//! live in data rather than code: a [`PatternSet`] is an ordered list of
//! [`PatternRule`]s, each pairing a regex with the status it implies.
//! Swapping the table (e.g. for a localised UI) never touches the
//! reconciliation engine.

use regex::Regex;
use scribe_types::EntryStatus;
use thiserror::Error;

use crate::ModerationDraft;

/// Errors that can occur while building a pattern table.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A rule's regex failed to compile.
    #[error("invalid moderation pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// What a matching rule records about the moderated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    /// Temporary mute; the `duration` capture carries the span text.
    Timeout,
    /// Permanent removal.
    Ban,
}

/// One moderation-notice rule.
///
/// Rules capture the moderated user's name through a `name` named group.
/// Timeout rules additionally capture the span through a `duration` group.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: Regex,
    kind: RuleKind,
}

impl PatternRule {
    /// Builds a timeout rule from a regex with `name` and `duration`
    /// capture groups.
    pub fn timeout(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            kind: RuleKind::Timeout,
        })
    }

    /// Builds a ban rule from a regex with a `name` capture group.
    pub fn ban(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            kind: RuleKind::Ban,
        })
    }

    fn apply(&self, text: &str) -> Option<ModerationDraft> {
        let caps = self.pattern.captures(text)?;
        let name = caps
            .name("name")
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        let status = match self.kind {
            RuleKind::Timeout => {
                let duration = caps
                    .name("duration")
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                EntryStatus::Timeout(duration)
            }
            RuleKind::Ban => EntryStatus::Banned,
        };

        Some(ModerationDraft {
            name,
            status,
            notice: text.to_string(),
        })
    }
}

/// Ordered table of moderation-notice rules; first match wins.
#[derive(Debug, Clone)]
pub struct PatternSet {
    rules: Vec<PatternRule>,
}

impl PatternSet {
    /// Builds a table from the given rules, evaluated in order.
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// Matches notice text against the table.
    pub fn match_text(&self, text: &str) -> Option<ModerationDraft> {
        self.rules.iter().find_map(|rule| rule.apply(text))
    }
}

impl Default for PatternSet {
    /// The built-in English-UI rules: timeout first, then ban.
    fn default() -> Self {
        Self::new(vec![
            PatternRule::timeout(r"^(?P<name>.+?) was timed out for (?P<duration>.+?)\.?$")
                .unwrap(),
            PatternRule::ban(r"^(?P<name>.+?) (?:has been removed|was banned)\.?$").unwrap(),
        ])
    }
}
