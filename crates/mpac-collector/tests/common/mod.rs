//! Scripted browser driver shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mpac_collector::{BrowserDriver, CollectorConfig, DownloadSignal, DriverError, Period};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A driver call, recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String),
    ConfigureDownloads(PathBuf),
    SetValue(String, String),
    Click(String),
    AwaitDownload,
    Close,
}

/// Knobs for failure scenarios.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Sleep this long when navigating to a URL ending with the given suffix.
    pub stall_navigation: Option<(String, Duration)>,
    pub fail_navigation: bool,
    pub fail_set_value: bool,
    pub fail_click: bool,
    /// Click succeeds but nothing is downloaded.
    pub skip_download: bool,
    pub cancel_download: bool,
    /// Report `Completed` instead of sleeping through the settle delay.
    pub download_events: bool,
}

/// Fake tab: clicking the export button writes a GUID-named file into the
/// configured download directory, like Chromium with `AllowAndName`.
pub struct FakeDriver {
    calls: Arc<Mutex<Vec<Call>>>,
    script: Script,
    current_url: Option<String>,
    download_dir: Option<PathBuf>,
    downloads: u32,
    last_guid: Option<String>,
}

impl FakeDriver {
    pub fn new(script: Script) -> (Self, Arc<Mutex<Vec<Call>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let driver = Self {
            calls: Arc::clone(&calls),
            script,
            current_url: None,
            download_dir: None,
            downloads: 0,
            last_guid: None,
        };
        (driver, calls)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.record(Call::Navigate(url.to_string()));
        if self.script.fail_navigation {
            return Err(DriverError::Other("net::ERR_NAME_NOT_RESOLVED".into()));
        }
        if let Some((suffix, stall)) = &self.script.stall_navigation {
            if url.ends_with(suffix.as_str()) {
                tokio::time::sleep(*stall).await;
            }
        }
        self.current_url = Some(url.to_string());
        Ok(())
    }

    async fn configure_downloads(&mut self, dir: &Path) -> Result<(), DriverError> {
        self.record(Call::ConfigureDownloads(dir.to_path_buf()));
        self.download_dir = Some(dir.to_path_buf());
        Ok(())
    }

    async fn set_value(&mut self, xpath: &str, value: &str) -> Result<(), DriverError> {
        self.record(Call::SetValue(xpath.to_string(), value.to_string()));
        if self.script.fail_set_value {
            return Err(DriverError::ElementNotFound(xpath.to_string()));
        }
        Ok(())
    }

    async fn click_visible(&mut self, xpath: &str) -> Result<(), DriverError> {
        self.record(Call::Click(xpath.to_string()));
        if self.script.fail_click {
            return Err(DriverError::ElementNotFound(xpath.to_string()));
        }
        if self.script.skip_download {
            return Ok(());
        }
        let dir = self
            .download_dir
            .clone()
            .ok_or_else(|| DriverError::Other("downloads not configured".into()))?;
        self.downloads += 1;
        let guid = format!("{:08x}-4e1f-9a7c-download", self.downloads);
        let body = format!("xlsx from {}", self.current_url.as_deref().unwrap_or(""));
        std::fs::write(dir.join(&guid), body).map_err(|e| DriverError::Other(e.to_string()))?;
        self.last_guid = Some(guid);
        Ok(())
    }

    async fn await_download(&mut self, settle: Duration) -> Result<DownloadSignal, DriverError> {
        self.record(Call::AwaitDownload);
        let guid = self.last_guid.clone().unwrap_or_default();
        if self.script.cancel_download {
            return Err(DriverError::DownloadCanceled { guid });
        }
        if self.script.download_events {
            return Ok(DownloadSignal::Completed { guid });
        }
        tokio::time::sleep(settle).await;
        Ok(DownloadSignal::Assumed)
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        self.record(Call::Close);
        Ok(())
    }
}

/// Config with millisecond delays writing into `output`.
pub fn fast_config(month: &str, year: &str, output: &Path) -> CollectorConfig {
    CollectorConfig::new(Period::parse(month, year).unwrap(), output)
        .with_step_delay(Duration::from_millis(1))
        .unwrap()
        .with_deadline(Duration::from_secs(10))
        .unwrap()
}

pub fn clicks(calls: &Arc<Mutex<Vec<Call>>>) -> usize {
    calls
        .lock()
        .unwrap()
        .iter()
        .filter(|c| matches!(c, Call::Click(_)))
        .count()
}
