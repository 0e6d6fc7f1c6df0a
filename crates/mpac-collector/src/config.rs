//! Run configuration: the target period, output location, and timing knobs.
//!
//! A [`CollectorConfig`] is built once at startup and handed to the
//! [`Collector`](crate::collector::Collector) by value. Nothing mutates it
//! afterwards.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default overall budget for one two-category collection.
pub const DEFAULT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(120);

/// Default wait after every UI-mutating action.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_secs(5);

/// User agent the portal is known to serve the export form to.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/77.0.3830.0 Safari/537.36";

/// A validated month/year pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    month: u8,
    year: u16,
}

impl Period {
    /// Parse a month (`"7"` or `"07"`) and a four-digit year.
    pub fn parse(month: &str, year: &str) -> Result<Self, ConfigError> {
        let month_str = month.trim();
        if month_str.is_empty()
            || month_str.len() > 2
            || !month_str.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ConfigError::InvalidMonth(month.to_string()));
        }
        let parsed_month: u8 = month_str
            .parse()
            .map_err(|_| ConfigError::InvalidMonth(month.to_string()))?;
        if !(1..=12).contains(&parsed_month) {
            return Err(ConfigError::InvalidMonth(month.to_string()));
        }

        let year_str = year.trim();
        if year_str.len() != 4 || !year_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidYear(year.to_string()));
        }
        let parsed_year: u16 = year_str
            .parse()
            .map_err(|_| ConfigError::InvalidYear(year.to_string()))?;

        Ok(Self {
            month: parsed_month,
            year: parsed_year,
        })
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    /// Two-digit month used in output file names (`"07"`).
    pub fn month_label(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Unpadded month the page's `numMes` select expects (`"7"`).
    pub fn month_control_value(&self) -> String {
        self.month.to_string()
    }

    /// Four-digit year for both the `ano` select and file names.
    pub fn year_label(&self) -> String {
        format!("{:04}", self.year)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.month_label(), self.year_label())
    }
}

/// Immutable settings for one collection run.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    period: Period,
    output_dir: PathBuf,
    collection_timeout: Duration,
    step_delay: Duration,
}

impl CollectorConfig {
    /// Create a config with the default deadline and step delay.
    pub fn new(period: Period, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            period,
            output_dir: output_dir.into(),
            collection_timeout: DEFAULT_COLLECTION_TIMEOUT,
            step_delay: DEFAULT_STEP_DELAY,
        }
    }

    /// Override the overall collection deadline.
    pub fn with_deadline(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("collection timeout"));
        }
        self.collection_timeout = timeout;
        Ok(self)
    }

    /// Override the inter-step delay.
    pub fn with_step_delay(mut self, delay: Duration) -> Result<Self, ConfigError> {
        if delay.is_zero() {
            return Err(ConfigError::ZeroDuration("step delay"));
        }
        self.step_delay = delay;
        Ok(self)
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn collection_timeout(&self) -> Duration {
        self.collection_timeout
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }
}

/// How the Chromium process is launched.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Explicit Chromium executable; discovered when `None`.
    pub executable: Option<PathBuf>,
    pub headless: bool,
    pub user_agent: String,
    /// Timeout for individual CDP requests.
    pub request_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}
