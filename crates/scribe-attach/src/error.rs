//! Error types for attachment control.

/// Errors that can occur while attaching to an event source.
#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    /// The observed container does not exist (yet). Recovered locally by
    /// retrying; surfaced as the terminal `NotFound` phase once the retry
    /// bound is exceeded. Never fatal.
    #[error("event source unavailable: {0}")]
    SourceUnavailable(String),
}
