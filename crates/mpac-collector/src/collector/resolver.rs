//! Download resolver: claim the newest file in a download directory.
//!
//! Chromium names downloads by GUID, so the just-downloaded spreadsheet is
//! found by modification time and renamed to its caller-facing name. Each
//! export downloads into its own scratch directory, which keeps "newest"
//! unambiguous as long as exports run one at a time.

use crate::error::ResolveError;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Suffix Chromium uses for downloads still being written.
const PARTIAL_SUFFIX: &str = ".crdownload";

/// Find the most recently modified regular file in `dir`.
///
/// Directories and partial downloads are skipped. Equal modification times
/// resolve to the lexicographically greatest file name.
pub fn newest_file(dir: &Path) -> Result<PathBuf, ResolveError> {
    let read_dir_err = |source| ResolveError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let path = entry.map_err(read_dir_err)?.path();
        if is_partial(&path) {
            continue;
        }

        let stat_err = |source| ResolveError::Stat {
            path: path.clone(),
            source,
        };
        let meta = fs::metadata(&path).map_err(stat_err)?;
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().map_err(stat_err)?;

        let is_newer = match &newest {
            None => true,
            Some((best_time, best_path)) => {
                (modified, path.file_name()) > (*best_time, best_path.file_name())
            }
        };
        if is_newer {
            newest = Some((modified, path));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| ResolveError::Empty {
            dir: dir.to_path_buf(),
        })
}

/// Rename the newest file in `dir` to `target`. Returns the original path.
pub fn claim_newest(dir: &Path, target: &Path) -> Result<PathBuf, ResolveError> {
    let source = newest_file(dir)?;
    fs::rename(&source, target).map_err(|e| ResolveError::Rename {
        from: source.clone(),
        to: target.to_path_buf(),
        source: e,
    })?;
    Ok(source)
}

/// Empty `dir` (creating it if needed) before a download lands in it.
pub fn prepare_scratch_dir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(dir)
}

/// Remove a scratch directory once its download has been claimed.
pub fn discard_scratch_dir(dir: &Path) {
    if let Err(e) = fs::remove_dir_all(dir) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!("failed to remove {}: {e}", dir.display());
        }
    }
}

/// Removes a scratch directory when dropped.
///
/// Covers early returns and deadline cancellation, which drops the
/// in-flight step without running its remaining code.
#[derive(Debug)]
pub struct ScratchGuard {
    dir: PathBuf,
}

impl ScratchGuard {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }
}

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        discard_scratch_dir(&self.dir);
    }
}

fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| name.ends_with(PARTIAL_SUFFIX))
}
