//! Collection pipeline: Navigator → Period Selector → Exporter, once per
//! report category, against a single browser tab.
//!
//! Categories run strictly one after another. The download resolver relies
//! on that: exports never overlap, so the file it claims is the one the last
//! click produced. The whole run is bounded by the configured collection
//! deadline; when it expires the in-flight step is dropped and the run fails.

pub mod exporter;
pub mod navigator;
pub mod period;
pub mod resolver;

use crate::config::CollectorConfig;
use crate::driver::{BrowserDriver, DriverError};
use crate::error::CollectError;
use crate::progress::{ProgressEventKind, ProgressSink};
use crate::report::ReportCategory;
use std::path::PathBuf;
use std::time::Instant;
use tracing::Instrument;

/// Runs one collection against a browser driver.
pub struct Collector {
    config: CollectorConfig,
    driver: Box<dyn BrowserDriver>,
    progress: ProgressSink,
}

impl Collector {
    pub fn new(config: CollectorConfig, driver: Box<dyn BrowserDriver>) -> Self {
        Self {
            config,
            driver,
            progress: ProgressSink::logging(),
        }
    }

    /// Report progress to `sink` instead of the default logging-only sink.
    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = sink;
        self
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Collect both reports.
    ///
    /// Returns `[pay statement, indemnity]` output paths in that order.
    pub async fn run(&mut self) -> Result<Vec<PathBuf>, CollectError> {
        let deadline = self.config.collection_timeout();
        let span = tracing::info_span!("collect", period = %self.config.period());

        match tokio::time::timeout(deadline, self.collect_all().instrument(span)).await {
            Ok(result) => result,
            Err(_) => Err(CollectError::DeadlineExceeded(deadline)),
        }
    }

    /// Release the browser.
    pub async fn close(self) -> Result<(), DriverError> {
        self.driver.close().await
    }

    async fn collect_all(&mut self) -> Result<Vec<PathBuf>, CollectError> {
        let started = Instant::now();
        let mut paths = Vec::with_capacity(ReportCategory::ALL.len());
        for category in ReportCategory::ALL {
            paths.push(self.collect_category(category).await?);
        }

        self.progress.emit(ProgressEventKind::RunCompleted {
            paths: paths.clone(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        });
        Ok(paths)
    }

    async fn collect_category(&mut self, category: ReportCategory) -> Result<PathBuf, CollectError> {
        let started = Instant::now();
        let driver = self.driver.as_mut();
        self.progress.emit(ProgressEventKind::CategoryStarted { category });

        // Cleans up if a step fails or the deadline drops this future.
        let _scratch = resolver::ScratchGuard::new(category.scratch_dir(self.config.output_dir()));
        let download_dir =
            navigator::open_listing(driver, &self.config, category, &self.progress).await?;
        period::select_period(driver, &self.config, &self.progress).await?;
        let path =
            exporter::export(driver, &self.config, category, &download_dir, &self.progress)
                .await?;

        self.progress.emit(ProgressEventKind::CategoryCompleted {
            category,
            path: path.clone(),
            duration_ms: started.elapsed().as_millis() as u64,
        });
        Ok(path)
    }
}
