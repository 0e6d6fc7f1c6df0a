//! Error types for the collection pipeline.
//!
//! Every variant is terminal for a run. Callers decide whether to retry the
//! whole collection; nothing inside the pipeline does.

use crate::driver::DriverError;
use crate::report::ReportCategory;
use std::path::PathBuf;
use std::time::Duration;

/// Invalid run configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid month {0:?}: expected 1..=12, optionally zero-padded")]
    InvalidMonth(String),

    #[error("invalid year {0:?}: expected four digits")]
    InvalidYear(String),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Failures while claiming a downloaded file.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("failed to read directory {}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stat {}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no downloaded file found in {}", .dir.display())]
    Empty { dir: PathBuf },

    #[error("failed to rename {} -> {}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Terminal outcome of a failed collection run.
#[derive(thiserror::Error, Debug)]
pub enum CollectError {
    #[error("failed to open {category} listing at {url}")]
    Navigation {
        category: ReportCategory,
        url: String,
        #[source]
        source: DriverError,
    },

    #[error("failed to prepare download directory {}", .dir.display())]
    ScratchDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to select period {period}")]
    Selection {
        period: String,
        #[source]
        source: DriverError,
    },

    #[error("failed to trigger export of {}", .file.display())]
    ExportTrigger {
        file: PathBuf,
        #[source]
        source: DriverError,
    },

    #[error("download of {} did not finish", .file.display())]
    Download {
        file: PathBuf,
        #[source]
        source: DriverError,
    },

    #[error("failed to rename downloaded file to {}", .file.display())]
    Resolve {
        file: PathBuf,
        #[source]
        source: ResolveError,
    },

    #[error("download of {} was not completed", .file.display())]
    DownloadMissing { file: PathBuf },

    #[error("collection deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl CollectError {
    /// True when the run was cut short by the collection deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::DeadlineExceeded(_))
    }
}
