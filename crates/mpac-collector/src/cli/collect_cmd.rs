//! Run one collection for a month/year and print the output paths.

use crate::cli::output::{render_paths, OutputMode};
use crate::collector::Collector;
use crate::config::{BrowserOptions, CollectorConfig, Period};
use crate::driver::chromium::ChromiumDriver;
use crate::progress::ProgressSink;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

/// Parameters for one `collect` invocation.
#[derive(Debug, Clone)]
pub struct CollectRequest {
    pub month: String,
    pub year: String,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub step_delay: Duration,
    pub browser: BrowserOptions,
    /// Stream progress events to stderr as JSON lines.
    pub stream_events: bool,
}

impl CollectRequest {
    /// Validate the request into a collector configuration.
    pub fn to_config(&self) -> Result<CollectorConfig> {
        let period = Period::parse(&self.month, &self.year)?;
        let config = CollectorConfig::new(period, &self.output_dir)
            .with_deadline(self.timeout)?
            .with_step_delay(self.step_delay)?;
        Ok(config)
    }
}

pub async fn run(request: CollectRequest, mode: OutputMode) -> Result<()> {
    let config = request.to_config().context("invalid collection parameters")?;
    std::fs::create_dir_all(config.output_dir()).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.output_dir().display()
        )
    })?;

    let driver = ChromiumDriver::launch(&request.browser)
        .await
        .context("failed to start Chromium")?;
    let mut collector = Collector::new(config, Box::new(driver));

    let printer = if request.stream_events {
        let (sink, mut rx) = ProgressSink::channel(64);
        collector = collector.with_progress(sink);
        Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => match serde_json::to_string(&event) {
                        Ok(line) => eprintln!("{line}"),
                        Err(e) => warn!("failed to encode progress event: {e}"),
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("progress printer skipped {skipped} events")
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }))
    } else {
        None
    };

    let result = collector.run().await;
    if let Err(e) = collector.close().await {
        warn!("failed to close browser: {e}");
    }
    if let Some(printer) = printer {
        let _ = printer.await;
    }

    let paths = result.context("collection failed")?;
    println!("{}", render_paths(mode, &paths));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(month: &str, year: &str) -> CollectRequest {
        CollectRequest {
            month: month.to_string(),
            year: year.to_string(),
            output_dir: PathBuf::from("/tmp/x"),
            timeout: Duration::from_secs(60),
            step_delay: Duration::from_secs(2),
            browser: BrowserOptions::default(),
            stream_events: false,
        }
    }

    #[test]
    fn test_request_builds_config() {
        let config = request("07", "2023").to_config().unwrap();
        assert_eq!(config.period().month(), 7);
        assert_eq!(config.period().year(), 2023);
        assert_eq!(config.collection_timeout(), Duration::from_secs(60));
        assert_eq!(config.step_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_request_rejects_bad_month() {
        let err = request("13", "2023").to_config().unwrap_err();
        assert!(format!("{err:#}").contains("invalid month"));
    }

    #[test]
    fn test_request_rejects_zero_timeout() {
        let mut req = request("01", "2023");
        req.timeout = Duration::ZERO;
        assert!(req.to_config().is_err());
    }
}
