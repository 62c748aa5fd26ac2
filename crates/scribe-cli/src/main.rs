//! Scribe binary — replays a recorded capture session through the
//! reconciliation engine and exports the resulting log.
//!
//! Starts with structured logging and TOML/env configuration, drives the
//! attachment supervisor over a JSONL replay source, and writes the CSV
//! (and optionally the workbook sheets) on completion or on
//! SIGTERM/SIGINT.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use scribe_attach::{AttachConfig, Supervisor};
use scribe_cli::config::{self, Config};
use scribe_cli::jsonl::JsonlSource;
use scribe_engine::Reconciler;
use scribe_export::{build_workbook, write_csv_file, CsvOptions};
use scribe_extract::PatternSet;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("SCRIBE_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn attach_config(config: &Config) -> AttachConfig {
    AttachConfig {
        poll_interval: Duration::from_millis(config.attach.poll_interval_ms),
        initial_attempts: config.attach.initial_attempts,
        reattach_attempts: config.attach.reattach_attempts,
    }
}

fn sheet_path(base: &Path, sheet: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("export");
    base.with_file_name(format!("{stem}.{}.csv", sheet.to_lowercase()))
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("scribe.toml"));

    // Load configuration
    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — scribe cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    // Engine and supervisor
    let engine = Arc::new(Mutex::new(Reconciler::new(PatternSet::default())));
    let counter = engine.lock().count();
    let source = JsonlSource::new(&config.input.path);
    let supervisor = Supervisor::new(source, attach_config(&config));
    let mut phase_rx = supervisor.phase();

    // Mirror phase transitions into the log (the status-line stand-in).
    tokio::spawn(async move {
        while phase_rx.changed().await.is_ok() {
            let phase = *phase_rx.borrow();
            tracing::info!(phase = %phase, "attachment status");
        }
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut run = tokio::spawn(supervisor.run(engine.clone(), shutdown_rx));

    let early = tokio::select! {
        result = &mut run => Some(result.expect("supervisor task panicked")),
        () = shutdown_signal() => {
            let _ = shutdown_tx.send(true);
            None
        }
    };
    let final_phase = match early {
        Some(phase) => phase,
        None => run.await.expect("supervisor task panicked"),
    };

    // Export
    let snapshot = engine.lock().snapshot();
    let options = CsvOptions {
        delimiter: config.output.delimiter,
        bom: config.output.bom,
    };
    let csv_path = PathBuf::from(&config.output.path);
    write_csv_file(&csv_path, &snapshot, &options)
        .expect("failed to write CSV export — check output.path in config");
    tracing::info!(path = %csv_path.display(), entries = snapshot.len(), "wrote CSV export");

    if let Some(session_url) = &config.output.session_url {
        let workbook = build_workbook(&snapshot, session_url);
        for sheet in workbook.sheets() {
            let path = sheet_path(&csv_path, sheet.name());
            std::fs::write(&path, sheet.to_csv(&options))
                .expect("failed to write workbook sheet — check output.path in config");
            tracing::info!(path = %path.display(), rows = sheet.rows().len(), "wrote workbook sheet");
        }
    }

    tracing::info!(
        phase = %final_phase,
        captured = *counter.borrow(),
        "scribe finished"
    );
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
