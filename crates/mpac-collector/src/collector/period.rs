//! Period selector: set the year and month controls on the listing page.

use crate::config::CollectorConfig;
use crate::driver::BrowserDriver;
use crate::error::CollectError;
use crate::progress::{ProgressEventKind, ProgressSink};

/// Year `<select>` on both listing pages.
pub const YEAR_SELECT_XPATH: &str = r#"//select[@id="ano"]"#;

/// Month `<select>`; option values are unpadded ("7", not "07").
pub const MONTH_SELECT_XPATH: &str = r#"//select[@id="numMes"]"#;

pub async fn select_period(
    driver: &mut dyn BrowserDriver,
    config: &CollectorConfig,
    progress: &ProgressSink,
) -> Result<(), CollectError> {
    let period = config.period();
    let year = period.year_label();
    let month = period.month_control_value();
    let selection_err = |source| CollectError::Selection {
        period: period.to_string(),
        source,
    };

    driver
        .set_value(YEAR_SELECT_XPATH, &year)
        .await
        .map_err(selection_err)?;
    tokio::time::sleep(config.step_delay()).await;

    driver
        .set_value(MONTH_SELECT_XPATH, &month)
        .await
        .map_err(selection_err)?;
    tokio::time::sleep(config.step_delay()).await;

    progress.emit(ProgressEventKind::PeriodSelected { month, year });
    Ok(())
}
