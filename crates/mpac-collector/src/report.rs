//! The two report categories published on the portal.

use crate::config::Period;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Listing for active members' pay statements.
pub const PAY_STATEMENT_URL: &str = "http://transparencia.mpac.mp.br/categoria_arquivos/112";

/// Listing for active members' indemnity payments.
pub const INDEMNITY_URL: &str = "http://transparencia.mpac.mp.br/categoria_arquivos/119";

/// A report kind collected by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    PayStatement,
    Indemnity,
}

impl ReportCategory {
    /// Collection order. Result paths follow the same order.
    pub const ALL: [ReportCategory; 2] = [ReportCategory::PayStatement, ReportCategory::Indemnity];

    pub fn listing_url(self) -> &'static str {
        match self {
            Self::PayStatement => PAY_STATEMENT_URL,
            Self::Indemnity => INDEMNITY_URL,
        }
    }

    /// File name token shared with the downstream spreadsheet parser.
    /// Changing these breaks parsing of collected files.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::PayStatement => "contracheque",
            Self::Indemnity => "verbas-indenizatorias",
        }
    }

    /// `<output>/membros-ativos-<prefix>-<MM>-<YYYY>.xlsx`
    pub fn output_path(self, output_dir: &Path, period: Period) -> PathBuf {
        output_dir.join(format!(
            "membros-ativos-{}-{}-{}.xlsx",
            self.file_prefix(),
            period.month_label(),
            period.year_label()
        ))
    }

    /// Single-use directory Chromium downloads into for this category.
    pub fn scratch_dir(self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!(".download-{}", self.file_prefix()))
    }
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PayStatement => write!(f, "pay statement"),
            Self::Indemnity => write!(f, "indemnity"),
        }
    }
}
