//! Result printing for the binary. Results go to stdout; logs go to stderr.

use serde::Serialize;
use std::path::PathBuf;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One path per line.
    #[default]
    Plain,
    /// A single JSON object.
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Plain
        }
    }

    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

#[derive(Debug, Serialize)]
struct CollectedFiles<'a> {
    files: &'a [PathBuf],
}

/// Render collected file paths for stdout.
pub fn render_paths(mode: OutputMode, paths: &[PathBuf]) -> String {
    match mode {
        OutputMode::Plain => paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        OutputMode::Json => serde_json::to_string_pretty(&CollectedFiles { files: paths })
            .unwrap_or_else(|_| "{}".to_string()),
    }
}

/// Render a terminal error for stdout (JSON) or stderr (plain).
pub fn render_error(mode: OutputMode, err: &anyhow::Error) -> String {
    match mode {
        OutputMode::Plain => format!("  Error: {err:#}"),
        OutputMode::Json => serde_json::json!({
            "error": true,
            "message": format!("{err:#}"),
        })
        .to_string(),
    }
}
