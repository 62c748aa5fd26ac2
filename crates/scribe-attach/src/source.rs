//! The consumed event-source interface.

use scribe_types::{MutationBatch, SourceNode};
use tokio::sync::mpsc;

use crate::error::AttachError;

/// A source of structural add/remove notifications.
///
/// Implementations adapt whatever mechanism observes the content tree —
/// a live observer, a replay file, a scripted fixture — to one uniform
/// seam the supervisor can drive.
pub trait EventSource: Send {
    /// Human-readable name for this source, used in logs.
    fn name(&self) -> &'static str;

    /// Attempts to locate the observed container and begin observing it.
    ///
    /// Fails with [`AttachError::SourceUnavailable`] while the container
    /// is absent; the supervisor retries on its polling interval. On
    /// success the returned subscription is live immediately.
    fn attach(&mut self) -> Result<Subscription, AttachError>;
}

/// A live attachment to an event source.
pub struct Subscription {
    /// Nodes already present in the container at attach time, in
    /// document order. Captured once before any live batch.
    pub backfill: Vec<SourceNode>,
    /// Live notification batches. The sender side closing means the
    /// source was torn down and the supervisor should search again.
    pub batches: mpsc::Receiver<MutationBatch>,
}
