//! Navigator: open a category's listing page and arm downloads.

use super::resolver;
use crate::config::CollectorConfig;
use crate::driver::BrowserDriver;
use crate::error::CollectError;
use crate::progress::{ProgressEventKind, ProgressSink};
use crate::report::ReportCategory;
use std::path::PathBuf;

/// Load the listing page for `category` and point downloads at a fresh
/// scratch directory. Returns that directory.
pub async fn open_listing(
    driver: &mut dyn BrowserDriver,
    config: &CollectorConfig,
    category: ReportCategory,
    progress: &ProgressSink,
) -> Result<PathBuf, CollectError> {
    let download_dir = category.scratch_dir(config.output_dir());
    resolver::prepare_scratch_dir(&download_dir).map_err(|source| CollectError::ScratchDir {
        dir: download_dir.clone(),
        source,
    })?;

    let url = category.listing_url();
    let navigation_err = |source| CollectError::Navigation {
        category,
        url: url.to_string(),
        source,
    };

    driver.navigate(url).await.map_err(navigation_err)?;
    tokio::time::sleep(config.step_delay()).await;

    // Download behavior is tab-scoped; re-assert it after every navigation.
    driver
        .configure_downloads(&download_dir)
        .await
        .map_err(navigation_err)?;

    progress.emit(ProgressEventKind::ListingLoaded {
        category,
        url: url.to_string(),
        download_dir: download_dir.clone(),
    });
    Ok(download_dir)
}
