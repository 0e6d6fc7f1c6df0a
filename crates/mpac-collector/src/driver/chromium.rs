//! Chromium-backed driver using chromiumoxide.

use super::{BrowserDriver, DownloadSignal, DriverError};
use crate::config::BrowserOptions;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    DownloadProgressState, EventDownloadProgress, SetDownloadBehaviorBehavior,
    SetDownloadBehaviorParams,
};
use chromiumoxide::listeners::EventStream;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Interval between visibility checks while waiting to click.
const VISIBILITY_POLL: Duration = Duration::from_millis(100);

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. MPAC_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("MPAC_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 3. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// A single Chromium tab with its browser process.
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    request_timeout: Duration,
    /// Download progress events, subscribed when downloads are configured.
    downloads: Option<EventStream<EventDownloadProgress>>,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank tab.
    pub async fn launch(options: &BrowserOptions) -> Result<Self, DriverError> {
        let chrome_path = match &options.executable {
            Some(path) => path.clone(),
            None => find_chromium().ok_or(DriverError::ChromiumNotFound)?,
        };

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .request_timeout(options.request_timeout)
            .arg(format!("--user-agent={}", options.user_agent))
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");
        builder = if options.headless {
            builder.arg("--headless=new")
        } else {
            builder.with_head()
        };
        let config = builder.build().map_err(DriverError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("chromium handler: {e}");
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            handler,
            request_timeout: options.request_timeout,
            downloads: None,
        })
    }

    async fn eval_bool(&self, script: String) -> Result<bool, DriverError> {
        let result = self.page.evaluate(script).await?;
        result
            .into_value::<bool>()
            .map_err(|e| DriverError::Script(e.to_string()))
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        let start = Instant::now();
        self.page.goto(url).await?;
        let _ = self.page.wait_for_navigation().await;
        debug!(url, load_ms = start.elapsed().as_millis() as u64, "page loaded");
        Ok(())
    }

    async fn configure_downloads(&mut self, dir: &Path) -> Result<(), DriverError> {
        // GUID file names; the resolver renames the file afterwards.
        let params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::AllowAndName)
            .download_path(dir.to_string_lossy().into_owned())
            .events_enabled(true)
            .build()
            .map_err(DriverError::Other)?;
        self.page.execute(params).await?;

        self.downloads = Some(self.page.event_listener::<EventDownloadProgress>().await?);
        Ok(())
    }

    async fn set_value(&mut self, xpath: &str, value: &str) -> Result<(), DriverError> {
        if self.eval_bool(set_value_script(xpath, value)).await? {
            Ok(())
        } else {
            Err(DriverError::ElementNotFound(xpath.to_string()))
        }
    }

    async fn click_visible(&mut self, xpath: &str) -> Result<(), DriverError> {
        let started = Instant::now();
        while !self.eval_bool(visibility_script(xpath)).await? {
            if started.elapsed() >= self.request_timeout {
                return Err(DriverError::ElementNotFound(xpath.to_string()));
            }
            tokio::time::sleep(VISIBILITY_POLL).await;
        }

        let element = self.page.find_xpath(xpath).await?;
        element.click().await?;
        Ok(())
    }

    async fn await_download(&mut self, settle: Duration) -> Result<DownloadSignal, DriverError> {
        let Some(events) = self.downloads.as_mut() else {
            tokio::time::sleep(settle).await;
            return Ok(DownloadSignal::Assumed);
        };

        let mut event = match tokio::time::timeout(settle, events.next()).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                warn!("download event stream closed, falling back to settle delay");
                tokio::time::sleep(settle).await;
                return Ok(DownloadSignal::Assumed);
            }
            Err(_) => {
                debug!(?settle, "no download events within settle delay");
                return Ok(DownloadSignal::Assumed);
            }
        };

        // Once the browser reports the download, wait for its terminal state.
        // The collection deadline bounds this loop.
        loop {
            match event.state {
                DownloadProgressState::Completed => {
                    return Ok(DownloadSignal::Completed {
                        guid: event.guid.clone(),
                    })
                }
                DownloadProgressState::Canceled => {
                    return Err(DriverError::DownloadCanceled {
                        guid: event.guid.clone(),
                    })
                }
                DownloadProgressState::InProgress => {
                    debug!(
                        guid = %event.guid,
                        received = event.received_bytes,
                        total = event.total_bytes,
                        "download in progress"
                    );
                }
            }
            event = events.next().await.ok_or_else(|| {
                DriverError::Other("download event stream closed mid-download".to_string())
            })?;
        }
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        let mut this = *self;
        this.downloads = None;
        let _ = this.page.close().await;
        let closed = this.browser.close().await;
        let _ = this.browser.wait().await;
        this.handler.abort();
        closed?;
        Ok(())
    }
}

/// JS that evaluates `xpath` to its first matching node.
fn xpath_lookup(xpath: &str) -> String {
    format!(
        "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
        js_string(xpath)
    )
}

/// Set a control's value and fire bubbling `input` and `change` events so
/// page handlers see the new selection.
fn set_value_script(xpath: &str, value: &str) -> String {
    format!(
        r#"(() => {{
            const el = {};
            if (!el) return false;
            el.value = {};
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()"#,
        xpath_lookup(xpath),
        js_string(value)
    )
}

fn visibility_script(xpath: &str) -> String {
    format!(
        r#"(() => {{
            const el = {};
            if (!el) return false;
            const style = window.getComputedStyle(el);
            const rect = el.getBoundingClientRect();
            return style.visibility !== 'hidden' && style.display !== 'none'
                && rect.width > 0 && rect.height > 0;
        }})()"#,
        xpath_lookup(xpath)
    )
}

/// Quote `s` as a JS string literal.
fn js_string(s: &str) -> String {
    // JSON strings are valid JS string literals; `<` is escaped so the
    // literal can never close a surrounding script tag.
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c")
}
