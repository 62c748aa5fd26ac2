//! JSONL replay event source.
//!
//! Reads a recorded capture session from a JSONL file — one
//! [`MutationBatch`] as JSON per line — and plays it through the
//! attachment machinery exactly as a live source would: the file's
//! batches arrive on the subscription channel and the channel closes
//! when the recording ends. Malformed lines are logged and skipped
//! rather than aborting the replay.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use scribe_attach::{AttachError, EventSource, Subscription};
use scribe_types::MutationBatch;
use tokio::sync::mpsc;

/// Replays a JSONL batch recording as an event source.
///
/// The file is consumed by the first successful attach; further attach
/// attempts report the source unavailable, which drives the supervisor
/// to its terminal phase once the replay is done.
pub struct JsonlSource {
    path: PathBuf,
    consumed: bool,
}

impl JsonlSource {
    /// Creates a replay source for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            consumed: false,
        }
    }

    fn read_batches(&self) -> Result<Vec<MutationBatch>, AttachError> {
        let file = File::open(&self.path).map_err(|e| {
            AttachError::SourceUnavailable(format!("cannot open {}: {e}", self.path.display()))
        })?;
        let reader = BufReader::new(file);

        let mut batches = Vec::new();
        for (line_number, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                AttachError::SourceUnavailable(format!(
                    "read error in {}: {e}",
                    self.path.display()
                ))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<MutationBatch>(&line) {
                Ok(batch) => batches.push(batch),
                Err(e) => {
                    tracing::warn!(line = line_number + 1, %e, "skipping malformed batch line");
                }
            }
        }
        Ok(batches)
    }
}

impl EventSource for JsonlSource {
    fn name(&self) -> &'static str {
        "jsonl-replay"
    }

    fn attach(&mut self) -> Result<Subscription, AttachError> {
        if self.consumed {
            return Err(AttachError::SourceUnavailable(
                "replay already consumed".to_string(),
            ));
        }

        let batches = self.read_batches()?;
        self.consumed = true;
        tracing::info!(
            path = %self.path.display(),
            batches = batches.len(),
            "replaying capture recording"
        );

        let (tx, rx) = mpsc::channel(batches.len().max(1));
        for batch in batches {
            tx.try_send(batch).expect("replay channel sized to recording");
        }

        Ok(Subscription {
            backfill: Vec::new(),
            batches: rx,
        })
    }
}
