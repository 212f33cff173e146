//! File ignore pattern handling for templates.
//! This module processes `.kangignore` files to exclude specific paths
//! from template materialization, similar to .gitignore functionality.

use crate::constants::{CONFIG_FILES, IGNORE_FILE};
use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::{fs::read_to_string, path::Path};

/// Patterns that are never copied into a generated project.
pub const DEFAULT_IGNORE_PATTERNS: [&str; 1] = ["**/.DS_Store"];

/// Reads the ignore file of a template and returns every exclusion pattern.
///
/// # Arguments
/// * `template_root` - Root directory of the template
///
/// # Returns
/// * `Result<Vec<String>>` - Default patterns, the manifest and ignore file
///   names, then the patterns listed in `.kangignore`
///
/// # Notes
/// - A missing `.kangignore` only yields the defaults
/// - Blank lines and lines starting with `#` are skipped
/// - Each pattern is validated with globset
///
/// # Example
/// ```ignore
/// # Contents of .kangignore:
/// *.log
/// coverage/**
/// ```
pub fn parse_ignore_file<P: AsRef<Path>>(template_root: P) -> Result<Vec<String>> {
    let mut patterns: Vec<String> = DEFAULT_IGNORE_PATTERNS
        .iter()
        .chain(CONFIG_FILES.iter())
        .chain(std::iter::once(&IGNORE_FILE))
        .map(|p| p.to_string())
        .collect();

    let ignore_path = template_root.as_ref().join(IGNORE_FILE);
    if let Ok(contents) = read_to_string(&ignore_path) {
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            Glob::new(line)?;
            patterns.push(line.to_string());
        }
    } else {
        debug!("{} does not exist", ignore_path.display());
    }

    Ok(patterns)
}

/// Compiles ignore patterns into a single GlobSet.
pub fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern.as_ref())?);
    }
    Ok(builder.build()?)
}
