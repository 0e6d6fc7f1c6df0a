//! Browser driver abstraction.
//!
//! Defines the `BrowserDriver` trait the collection steps talk to, so the
//! pipeline can run against Chromium (via chromiumoxide) or a scripted fake.

pub mod chromium;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Errors raised by a browser driver.
#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error("Chromium not found. Set MPAC_CHROMIUM_PATH or install Chrome/Chromium.")]
    ChromiumNotFound,

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("CDP error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("download {guid} was canceled by the browser")]
    DownloadCanceled { guid: String },

    #[error("{0}")]
    Other(String),
}

/// How the driver decided a download had finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DownloadSignal {
    /// The browser reported the download as completed.
    Completed { guid: String },
    /// No download events arrived within the settle delay; completion is assumed.
    Assumed,
}

/// A single browser tab driven through the export flow.
#[async_trait]
pub trait BrowserDriver: Send {
    /// Load `url` in the current tab.
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Send downloads to `dir` with download events enabled.
    ///
    /// Scoped to the tab, so it is re-applied before every export.
    async fn configure_downloads(&mut self, dir: &Path) -> Result<(), DriverError>;

    /// Set the `value` of the form control matched by `xpath`.
    async fn set_value(&mut self, xpath: &str, value: &str) -> Result<(), DriverError>;

    /// Wait until the element matched by `xpath` is visible, then click it.
    async fn click_visible(&mut self, xpath: &str) -> Result<(), DriverError>;

    /// Wait for the download started by the last click.
    ///
    /// Implementations without download events sleep `settle` and report
    /// [`DownloadSignal::Assumed`].
    async fn await_download(&mut self, settle: Duration) -> Result<DownloadSignal, DriverError> {
        tokio::time::sleep(settle).await;
        Ok(DownloadSignal::Assumed)
    }

    /// Close the tab and release the browser.
    async fn close(self: Box<Self>) -> Result<(), DriverError>;
}
