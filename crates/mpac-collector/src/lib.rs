// Copyright 2026 DadosJusBr Contributors
// SPDX-License-Identifier: MIT

//! MPAC collector: downloads the monthly pay statement and indemnity
//! spreadsheets from the MPAC transparency portal by driving headless Chromium.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use mpac_collector::{BrowserOptions, ChromiumDriver, Collector, CollectorConfig, Period};
//!
//! let config = CollectorConfig::new(Period::parse("07", "2023")?, "output");
//! let driver = ChromiumDriver::launch(&BrowserOptions::default()).await?;
//! let mut collector = Collector::new(config, Box::new(driver));
//! let _paths = collector.run().await?;
//! collector.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod collector;
pub mod config;
pub mod driver;
pub mod error;
pub mod progress;
pub mod report;

pub use collector::Collector;
pub use config::{BrowserOptions, CollectorConfig, Period};
pub use driver::chromium::{find_chromium, ChromiumDriver};
pub use driver::{BrowserDriver, DownloadSignal, DriverError};
pub use error::{CollectError, ConfigError, ResolveError};
pub use progress::{ProgressEvent, ProgressEventKind, ProgressSink};
pub use report::ReportCategory;
