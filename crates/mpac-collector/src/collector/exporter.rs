//! Exporter: click the spreadsheet export and claim the downloaded file.

use super::resolver;
use crate::config::CollectorConfig;
use crate::driver::BrowserDriver;
use crate::error::CollectError;
use crate::progress::{ProgressEventKind, ProgressSink};
use crate::report::ReportCategory;
use std::path::{Path, PathBuf};

/// Submit input of the `pesquisaReceita` form, which exports to Excel.
pub const EXPORT_BUTTON_XPATH: &str = "//*[@id='pesquisaReceita']/input";

/// Export `category` and rename the download to its output path.
///
/// `download_dir` must be the directory the Navigator armed for this
/// category. It is removed when this returns, whether or not the export
/// succeeded.
pub async fn export(
    driver: &mut dyn BrowserDriver,
    config: &CollectorConfig,
    category: ReportCategory,
    download_dir: &Path,
    progress: &ProgressSink,
) -> Result<PathBuf, CollectError> {
    let target = category.output_path(config.output_dir(), config.period());
    let _scratch = resolver::ScratchGuard::new(download_dir);

    driver
        .click_visible(EXPORT_BUTTON_XPATH)
        .await
        .map_err(|source| CollectError::ExportTrigger {
            file: target.clone(),
            source,
        })?;
    progress.emit(ProgressEventKind::ExportTriggered { category });

    let signal = driver
        .await_download(config.step_delay())
        .await
        .map_err(|source| CollectError::Download {
            file: target.clone(),
            source,
        })?;
    progress.emit(ProgressEventKind::DownloadSettled { category, signal });

    let source = resolver::claim_newest(download_dir, &target).map_err(|source| {
        CollectError::Resolve {
            file: target.clone(),
            source,
        }
    })?;
    progress.emit(ProgressEventKind::FileResolved {
        from: source,
        to: target.clone(),
    });

    if !target.exists() {
        return Err(CollectError::DownloadMissing { file: target });
    }
    Ok(target)
}
