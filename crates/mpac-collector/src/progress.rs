// Copyright 2026 DadosJusBr Contributors
// SPDX-License-Identifier: MIT

//! Progress event types and the injectable sink the collection steps report to.
//!
//! Each step receives a `ProgressSink` explicitly. The sink logs every event
//! through `tracing` and, when a subscriber channel is attached, forwards it on
//! a `tokio::sync::broadcast` channel. When no receiver is listening, events
//! are silently dropped.

use crate::driver::DownloadSignal;
use crate::report::ReportCategory;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

/// A progress event emitted during a collection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Monotonically increasing sequence number.
    pub seq: u64,
    /// Milliseconds since the sink was created.
    pub elapsed_ms: u64,
    /// The kind of progress event.
    pub event: ProgressEventKind,
}

/// The specific kind of progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProgressEventKind {
    /// Processing of a category began.
    CategoryStarted { category: ReportCategory },
    /// The listing page loaded and downloads were pointed at `download_dir`.
    ListingLoaded {
        category: ReportCategory,
        url: String,
        download_dir: PathBuf,
    },
    /// Year and month controls were set.
    PeriodSelected { month: String, year: String },
    /// The export button was clicked.
    ExportTriggered { category: ReportCategory },
    /// The driver considers the download finished.
    DownloadSettled {
        category: ReportCategory,
        signal: DownloadSignal,
    },
    /// The downloaded file was renamed to its final name.
    FileResolved { from: PathBuf, to: PathBuf },
    /// A category's output file is in place.
    CategoryCompleted {
        category: ReportCategory,
        path: PathBuf,
        duration_ms: u64,
    },
    /// Both categories were collected.
    RunCompleted { paths: Vec<PathBuf>, elapsed_ms: u64 },
}

impl std::fmt::Display for ProgressEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryStarted { category } => write!(f, "collecting {category}"),
            Self::ListingLoaded { category, url, .. } => {
                write!(f, "{category} listing loaded ({url})")
            }
            Self::PeriodSelected { month, year } => write!(f, "selected {month}/{year}"),
            Self::ExportTriggered { category } => write!(f, "{category} export triggered"),
            Self::DownloadSettled { category, signal } => match signal {
                DownloadSignal::Completed { guid } => {
                    write!(f, "{category} download completed ({guid})")
                }
                DownloadSignal::Assumed => {
                    write!(f, "{category} download assumed complete after settle delay")
                }
            },
            Self::FileResolved { from, to } => {
                write!(f, "renamed {} -> {}", from.display(), to.display())
            }
            Self::CategoryCompleted {
                category,
                path,
                duration_ms,
            } => write!(
                f,
                "{category} saved to {} in {duration_ms}ms",
                path.display()
            ),
            Self::RunCompleted { paths, elapsed_ms } => {
                write!(f, "collected {} files in {elapsed_ms}ms", paths.len())
            }
        }
    }
}

/// Destination for progress events, passed explicitly to each step.
#[derive(Clone)]
pub struct ProgressSink {
    tx: Option<broadcast::Sender<ProgressEvent>>,
    seq: Arc<AtomicU64>,
    started: Instant,
}

impl ProgressSink {
    /// A sink that only logs.
    pub fn logging() -> Self {
        Self {
            tx: None,
            seq: Arc::new(AtomicU64::new(0)),
            started: Instant::now(),
        }
    }

    /// A sink that logs and forwards events to the returned receiver.
    pub fn channel(capacity: usize) -> (Self, broadcast::Receiver<ProgressEvent>) {
        let (tx, rx) = broadcast::channel(capacity);
        let sink = Self {
            tx: Some(tx),
            ..Self::logging()
        };
        (sink, rx)
    }

    /// Record an event.
    pub fn emit(&self, event: ProgressEventKind) {
        tracing::info!("{event}");

        let Some(tx) = &self.tx else {
            return;
        };
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        // No receivers is fine; the event is dropped.
        let _ = tx.send(ProgressEvent {
            seq,
            elapsed_ms: self.started.elapsed().as_millis() as u64,
            event,
        });
    }
}

impl Default for ProgressSink {
    fn default() -> Self {
        Self::logging()
    }
}
