// src/report.rs

//! Output artifacts for a comparison
//!
//! Each category gets `<category>.pkgs.txt` with one package name per line
//! and `<category>.pkgs.sh` with one installer directive per line.

use crate::comparison::{Category, Comparison};
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn list_path(output_dir: &Path, category: Category) -> PathBuf {
    output_dir.join(format!("{}.pkgs.txt", category.as_str()))
}

pub fn script_path(output_dir: &Path, category: Category) -> PathBuf {
    output_dir.join(format!("{}.pkgs.sh", category.as_str()))
}

/// Script body running `installer` once per directive of `category`
pub fn script(comparison: &Comparison, category: Category, installer: &str) -> String {
    let mut out = String::from("#!/bin/sh\n");
    for directive in comparison.install_plan(category) {
        out.push_str(&format!("{} {}\n", installer, directive));
    }
    out
}

/// Write the package name list of every category
pub fn write_lists(comparison: &Comparison, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for category in Category::ALL {
        let path = list_path(output_dir, category);
        let mut content = String::new();
        for name in comparison.get(category) {
            content.push_str(name);
            content.push('\n');
        }
        fs::write(&path, content)?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Write the installer script of every category
pub fn write_scripts(
    comparison: &Comparison,
    output_dir: &Path,
    installer: &str,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for category in Category::ALL {
        let path = script_path(output_dir, category);
        fs::write(&path, script(comparison, category, installer))?;
        set_executable(&path)?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Write lists and scripts, creating `output_dir` if needed
pub fn write_all(comparison: &Comparison, output_dir: &Path, installer: &str) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    let lists = write_lists(comparison, output_dir)?;
    let scripts = write_scripts(comparison, output_dir, installer)?;
    info!(
        "Wrote {} package lists and {} scripts to {}",
        lists.len(),
        scripts.len(),
        output_dir.display()
    );
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
