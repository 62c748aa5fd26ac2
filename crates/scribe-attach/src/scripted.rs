//! An in-memory event source for tests and demos.

use std::collections::VecDeque;

use scribe_types::{MutationBatch, SourceNode};
use tokio::sync::mpsc;

use crate::error::AttachError;
use crate::source::{EventSource, Subscription};

/// One scripted attachment: the backfill present at attach time and the
/// live batches delivered afterwards. The subscription tears down on its
/// own once the batches are drained.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSession {
    pub backfill: Vec<SourceNode>,
    pub batches: Vec<MutationBatch>,
}

/// An [`EventSource`] that follows a script.
///
/// The first `ready_after` attach attempts fail as unavailable; each
/// following attempt consumes the next scripted session. Once the
/// sessions run out, attach fails again — driving the supervisor through
/// its full Searching → Attached → Searching → NotFound lifecycle without
/// any real UI tree behind it.
#[derive(Debug)]
pub struct ScriptedSource {
    ready_after: u32,
    attempts: u32,
    sessions: VecDeque<ScriptedSession>,
}

impl ScriptedSource {
    /// Creates a source that becomes ready after `ready_after` failed
    /// attempts and then plays `sessions` in order.
    pub fn new(ready_after: u32, sessions: Vec<ScriptedSession>) -> Self {
        Self {
            ready_after,
            attempts: 0,
            sessions: sessions.into(),
        }
    }

    /// Total attach attempts observed so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl EventSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn attach(&mut self) -> Result<Subscription, AttachError> {
        self.attempts += 1;
        if self.attempts <= self.ready_after {
            return Err(AttachError::SourceUnavailable(format!(
                "container not present (attempt {})",
                self.attempts
            )));
        }

        let Some(session) = self.sessions.pop_front() else {
            return Err(AttachError::SourceUnavailable(
                "no session remaining".to_string(),
            ));
        };

        // Capacity covers the whole script so the sends below cannot
        // block; dropping the sender closes the channel once drained,
        // which the supervisor reads as a teardown.
        let (tx, rx) = mpsc::channel(session.batches.len().max(1));
        for batch in session.batches {
            tx.try_send(batch).expect("scripted channel sized to script");
        }

        Ok(Subscription {
            backfill: session.backfill,
            batches: rx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fails_until_ready_then_plays_sessions() {
        let mut source = ScriptedSource::new(2, vec![ScriptedSession::default()]);

        assert!(source.attach().is_err());
        assert!(source.attach().is_err());
        assert!(source.attach().is_ok());
        // Script exhausted.
        assert!(source.attach().is_err());
        assert_eq!(source.attempts(), 4);
    }

    #[tokio::test]
    async fn subscription_delivers_batches_then_closes() {
        let session = ScriptedSession {
            backfill: vec![SourceNode::content("m1", "Alice", "hi")],
            batches: vec![MutationBatch {
                added: vec![SourceNode::content("m2", "Bob", "yo")],
                removed: vec![],
            }],
        };
        let mut source = ScriptedSource::new(0, vec![session]);

        let mut subscription = source.attach().expect("should attach");
        assert_eq!(subscription.backfill.len(), 1);

        let batch = subscription.batches.recv().await.expect("one batch");
        assert_eq!(batch.added.len(), 1);
        assert!(subscription.batches.recv().await.is_none(), "channel should close");
    }
}
