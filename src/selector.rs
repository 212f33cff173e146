//! Template file enumeration.
//! Splits a template tree into plain files, copied verbatim, and marked
//! files, whose name carries the marker and whose content is rendered.

use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::constants::MARKER;
use crate::error::{Error, Result};

/// A file of a template, relative to the template root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateFile {
    relative_path: PathBuf,
    is_marked: bool,
}

impl TemplateFile {
    pub fn new<P: Into<PathBuf>>(relative_path: P) -> Self {
        let relative_path = relative_path.into();
        let is_marked = relative_path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.contains(MARKER));
        Self { relative_path, is_marked }
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    pub fn is_marked(&self) -> bool {
        self.is_marked
    }

    /// Path the file is written to: same directory, marker characters
    /// stripped from the file name. Plain files keep their path.
    ///
    /// # Errors
    /// * `Error::TemplateError` if stripping the markers leaves no name
    pub fn rendered_relative_path(&self) -> Result<PathBuf> {
        if !self.is_marked {
            return Ok(self.relative_path.clone());
        }

        let file_name = self
            .relative_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let rendered_name = file_name.replace(MARKER, "");
        if rendered_name.is_empty() {
            return Err(Error::TemplateError(format!(
                "marked file '{}' has an empty name once markers are removed",
                self.relative_path.display()
            )));
        }

        Ok(self.relative_path.with_file_name(rendered_name))
    }
}

/// Lists every file under `template_root`, recursively, ordered by path.
pub fn list_files<P: AsRef<Path>>(template_root: P) -> Result<Vec<TemplateFile>> {
    let template_root = template_root.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(template_root).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::TemplateError(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative_path = entry
            .path()
            .strip_prefix(template_root)
            .map_err(|e| Error::TemplateError(e.to_string()))?;
        debug!("Found template file: {}", relative_path.display());
        files.push(TemplateFile::new(relative_path));
    }

    files.sort();
    Ok(files)
}

/// Splits files into `(plain, marked)`, preserving their order.
pub fn partition<I>(files: I) -> (Vec<TemplateFile>, Vec<TemplateFile>)
where
    I: IntoIterator<Item = TemplateFile>,
{
    files.into_iter().partition(|file| !file.is_marked())
}
