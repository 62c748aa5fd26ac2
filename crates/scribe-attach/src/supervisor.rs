//! The attachment state machine.

use std::sync::Arc;

use parking_lot::Mutex;
use scribe_engine::Reconciler;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::source::{EventSource, Subscription};

/// Observable phase of the attachment state machine.
///
/// Published on a watch channel so a status display can mirror it
/// ("searching…", "logging…", "no chat found").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachPhase {
    /// Not attached and not searching (initial state, or shut down).
    Detached,
    /// Polling for the event source to become available.
    Searching,
    /// Subscribed and applying live notifications.
    Attached,
    /// Retry bound exceeded; terminal. The engine stays idle and the
    /// capture log is left intact.
    NotFound,
}

impl AttachPhase {
    /// Returns the canonical label for this phase.
    pub fn label(self) -> &'static str {
        match self {
            Self::Detached => "detached",
            Self::Searching => "searching",
            Self::Attached => "attached",
            Self::NotFound => "not-found",
        }
    }
}

impl std::fmt::Display for AttachPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Timing and retry bounds for the supervisor.
#[derive(Debug, Clone)]
pub struct AttachConfig {
    /// Fixed interval between readiness polls.
    pub poll_interval: Duration,
    /// Attempts allowed for the initial search.
    pub initial_attempts: u32,
    /// Attempts allowed when searching again after a teardown.
    pub reattach_attempts: u32,
}

impl Default for AttachConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            initial_attempts: 60,
            reattach_attempts: 30,
        }
    }
}

/// Drives an [`EventSource`] and feeds its notifications to the engine.
///
/// The supervisor is the only caller of the engine's mutation entry
/// points, and it applies one batch at a time under the engine lock, so
/// notifications stay serialized end to end.
pub struct Supervisor<S> {
    source: S,
    config: AttachConfig,
    phase_tx: watch::Sender<AttachPhase>,
}

impl<S: EventSource> Supervisor<S> {
    /// Creates a supervisor in the `Detached` phase.
    pub fn new(source: S, config: AttachConfig) -> Self {
        let (phase_tx, _) = watch::channel(AttachPhase::Detached);
        Self {
            source,
            config,
            phase_tx,
        }
    }

    /// Subscribes to phase transitions.
    pub fn phase(&self) -> watch::Receiver<AttachPhase> {
        self.phase_tx.subscribe()
    }

    /// Runs the state machine until it reaches a terminal phase.
    ///
    /// Terminates with `NotFound` when a search exhausts its attempt
    /// bound, or with `Detached` when `shutdown` flips to `true` (or its
    /// sender is dropped). The capture log is never cleared here — after
    /// a teardown the existing history is kept and only the subscription
    /// is rebuilt.
    pub async fn run(
        mut self,
        engine: Arc<Mutex<Reconciler>>,
        mut shutdown: watch::Receiver<bool>,
    ) -> AttachPhase {
        let mut attempts_allowed = self.config.initial_attempts;

        loop {
            self.set_phase(AttachPhase::Searching);

            let outcome = tokio::select! {
                found = search(&mut self.source, self.config.poll_interval, attempts_allowed) => {
                    match found {
                        Some(subscription) => SearchOutcome::Found(subscription),
                        None => SearchOutcome::Exhausted,
                    }
                }
                () = shutdown_requested(&mut shutdown) => SearchOutcome::ShuttingDown,
            };

            let subscription = match outcome {
                SearchOutcome::Found(subscription) => subscription,
                SearchOutcome::Exhausted => return self.finish(AttachPhase::NotFound),
                SearchOutcome::ShuttingDown => return self.finish(AttachPhase::Detached),
            };

            self.set_phase(AttachPhase::Attached);
            tracing::info!(
                source = self.source.name(),
                backfill = subscription.backfill.len(),
                "attached to event source"
            );

            consume(&engine, subscription, &mut shutdown).await;
            if *shutdown.borrow() {
                return self.finish(AttachPhase::Detached);
            }

            tracing::info!(source = self.source.name(), "event source torn down, searching again");
            attempts_allowed = self.config.reattach_attempts;
        }
    }

    fn set_phase(&self, phase: AttachPhase) {
        tracing::debug!(phase = %phase, "attachment phase change");
        self.phase_tx.send_replace(phase);
    }

    fn finish(self, phase: AttachPhase) -> AttachPhase {
        self.set_phase(phase);
        phase
    }
}

/// Backfills then applies live batches until teardown or shutdown.
async fn consume(
    engine: &Arc<Mutex<Reconciler>>,
    subscription: Subscription,
    shutdown: &mut watch::Receiver<bool>,
) {
    {
        let mut engine = engine.lock();
        for node in &subscription.backfill {
            engine.on_added(node);
        }
    }

    let mut batches = subscription.batches;
    loop {
        tokio::select! {
            maybe = batches.recv() => match maybe {
                Some(batch) => engine.lock().apply(&batch),
                None => return,
            },
            () = shutdown_requested(shutdown) => return,
        }
    }
}

/// How one search round ended.
enum SearchOutcome {
    Found(Subscription),
    Exhausted,
    ShuttingDown,
}

/// Polls the source until it attaches or the attempt bound is exhausted.
async fn search<S: EventSource>(
    source: &mut S,
    poll_interval: Duration,
    attempts_allowed: u32,
) -> Option<Subscription> {
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut attempts = 0u32;

    loop {
        ticker.tick().await;
        attempts += 1;

        match source.attach() {
            Ok(subscription) => return Some(subscription),
            Err(err) => {
                tracing::debug!(
                    source = source.name(),
                    attempt = attempts,
                    limit = attempts_allowed,
                    %err,
                    "event source not ready"
                );
                if attempts >= attempts_allowed {
                    tracing::warn!(
                        source = source.name(),
                        attempts,
                        "event source not found within retry bound"
                    );
                    return None;
                }
            }
        }
    }
}

/// Resolves once shutdown is requested (or the shutdown sender is gone).
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
