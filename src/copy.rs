//! Glob-driven file copy used to materialize templates and lint configs.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Compiles `patterns` into `(includes, excludes)`. Patterns starting with
/// `!` are exclusions.
fn build_globsets<S: AsRef<str>>(patterns: &[S]) -> Result<(GlobSet, GlobSet)> {
    let mut includes = GlobSetBuilder::new();
    let mut excludes = GlobSetBuilder::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        match pattern.strip_prefix('!') {
            Some(negated) => excludes.add(Glob::new(negated)?),
            None => includes.add(Glob::new(pattern)?),
        };
    }

    Ok((includes.build()?, excludes.build()?))
}

/// Copies a file, creating the destination's parent directories.
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, dest: Q) -> Result<()> {
    let dest = dest.as_ref();
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| copy_failure(parent, e))?;
    }
    fs::copy(source.as_ref(), dest).map(|_| ()).map_err(|e| copy_failure(dest, e))
}

/// Writes text to a file, creating the destination's parent directories.
pub fn write_file<P: AsRef<Path>>(content: &str, dest: P) -> Result<()> {
    let dest = dest.as_ref();
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| copy_failure(parent, e))?;
    }
    fs::write(dest, content).map_err(|e| copy_failure(dest, e))
}

pub(crate) fn copy_failure(path: &Path, source: std::io::Error) -> Error {
    Error::CopyFailure { path: path.display().to_string(), source }
}

/// Copies every file under `source_root` matched by `patterns` into
/// `destination`, keeping paths relative to `source_root`.
///
/// # Arguments
/// * `source_root` - Directory the patterns are evaluated against
/// * `patterns` - Globs relative to `source_root`; a leading `!` excludes
/// * `destination` - Target directory
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Destination paths written, in path order
///
/// # Errors
/// * `Error::GlobError` for an invalid pattern
/// * `Error::CopyFailure` if a file cannot be copied
pub fn copy<P, Q, S>(source_root: P, patterns: &[S], destination: Q) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    S: AsRef<str>,
{
    let source_root = source_root.as_ref();
    let destination = destination.as_ref();
    let (includes, excludes) = build_globsets(patterns)?;
    let mut copied = Vec::new();

    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::TemplateError(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative_path = entry
            .path()
            .strip_prefix(source_root)
            .map_err(|e| Error::TemplateError(e.to_string()))?;

        if !includes.is_match(relative_path) {
            continue;
        }
        if excludes.is_match(relative_path) {
            debug!("Excluding {}", relative_path.display());
            continue;
        }

        let target = destination.join(relative_path);
        debug!("Copying file: {}", target.display());
        copy_file(entry.path(), &target)?;
        copied.push(target);
    }

    Ok(copied)
}
