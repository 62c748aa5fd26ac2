//! Attachment control for the capture pipeline.
//!
//! The event source (the external UI tree and its mutation notifications)
//! is consumed through the [`EventSource`] trait: one `attach` call either
//! fails because the observed container does not exist yet, or yields a
//! [`Subscription`] carrying the backfill nodes already present plus a
//! channel of live [`MutationBatch`]es. The channel closing models the
//! source being torn down (e.g. a client-side navigation invalidating the
//! container).
//!
//! [`Supervisor`] drives the state machine around that trait:
//!
//! ```text
//! Detached → Searching → Attached → (Searching again on teardown)
//!                ↓
//!            NotFound (retry bound exceeded, terminal)
//! ```
//!
//! Searching polls at a fixed interval with a bounded attempt count (60
//! initially, 30 on reattachment). The capture log is never cleared by
//! attachment transitions: history persists across reattachment, only the
//! subscription is rebuilt.

mod error;
mod scripted;
mod source;
mod supervisor;

pub use error::AttachError;
pub use scripted::{ScriptedSession, ScriptedSource};
pub use source::{EventSource, Subscription};
pub use supervisor::{AttachConfig, AttachPhase, Supervisor};
