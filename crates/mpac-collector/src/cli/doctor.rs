//! Environment readiness check.

use crate::driver::chromium::find_chromium;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Outcome of the readiness checks.
#[derive(Debug, Clone)]
pub struct DoctorReport {
    pub chromium: Option<PathBuf>,
    pub output_writable: bool,
}

impl DoctorReport {
    pub fn is_ready(&self) -> bool {
        self.chromium.is_some() && self.output_writable
    }
}

/// Probe Chromium and the output directory without printing.
pub fn check(output_dir: &Path, chromium: Option<PathBuf>) -> DoctorReport {
    DoctorReport {
        chromium: chromium.or_else(find_chromium),
        output_writable: is_writable(output_dir),
    }
}

/// Check Chromium availability and that the output directory is writable.
pub async fn run(output_dir: &Path, chromium: Option<PathBuf>) -> Result<()> {
    println!("MPAC Collector Doctor");
    println!("=====================");
    println!();

    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    let report = check(output_dir, chromium);
    match &report.chromium {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Install Chrome/Chromium or set MPAC_CHROMIUM_PATH."
        ),
    }
    if report.output_writable {
        println!("[OK] Output directory {} is writable", output_dir.display());
    } else {
        println!(
            "[!!] Output directory {} is not writable",
            output_dir.display()
        );
    }

    println!();
    if report.is_ready() {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
    }

    Ok(())
}

/// Create the directory if needed and try writing a scratch file into it.
fn is_writable(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let marker = dir.join(".mpac-doctor-write-test");
    let ok = std::fs::write(&marker, b"ok").is_ok();
    let _ = std::fs::remove_file(&marker);
    ok
}
