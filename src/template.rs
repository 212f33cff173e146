//! Template catalog.
//! Resolves a template name to its directory under `<templates>/projects`
//! and loads its configuration.

use std::fs;
use std::path::{Component, Path, PathBuf};

use include_dir::{include_dir, Dir};
use log::debug;
use tempfile::TempDir;

use crate::config::{get_config, TemplateConfig, TemplateKind};
use crate::constants::{CONFIGS_DIR, PROJECTS_DIR};
use crate::error::{Error, Result};
use crate::tooling::PackageManager;

/// A project template selected for a run.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    root: PathBuf,
    config: TemplateConfig,
}

impl Template {
    /// Loads the template `name` from `projects_root`.
    ///
    /// # Errors
    /// * `Error::TemplateError` if `name` is not a single directory name
    /// * `Error::TemplateDoesNotExistsError` if the directory is missing
    /// * `Error::ConfigError` if its manifest cannot be parsed
    pub fn load<P: AsRef<Path>>(projects_root: P, name: &str) -> Result<Self> {
        if !is_template_name(name) {
            return Err(Error::TemplateError(format!("invalid template name '{name}'")));
        }

        let root = projects_root.as_ref().join(name);
        if !root.is_dir() {
            return Err(Error::TemplateDoesNotExistsError {
                template_dir: root.display().to_string(),
            });
        }

        let config = get_config(&root, name)?;
        debug!("Loaded template '{}' from {}", name, root.display());
        Ok(Self { name: name.to_string(), root, config })
    }

    /// Builds a template from parts that are already known.
    pub fn from_parts<S: Into<String>, P: Into<PathBuf>>(
        name: S,
        root: P,
        config: TemplateConfig,
    ) -> Self {
        Self { name: name.into(), root: root.into(), config }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    pub fn kind(&self) -> TemplateKind {
        self.config.kind
    }

    /// Command that starts the generated project in development mode.
    pub fn dev_command(&self, package_manager: PackageManager) -> Option<String> {
        match self.kind() {
            TemplateKind::Runnable => Some(package_manager.dev_command()),
            TemplateKind::Library => None,
        }
    }
}

/// A template name must be exactly one normal path component.
fn is_template_name(name: &str) -> bool {
    if name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(component)), None) => component == name,
        _ => false,
    }
}

/// A template offered in the selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateChoice {
    pub name: String,
    pub description: String,
}

impl std::fmt::Display for TemplateChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.description)
        }
    }
}

/// Lists the templates found in `projects_root`, sorted by name.
pub fn available_templates<P: AsRef<Path>>(projects_root: P) -> Result<Vec<TemplateChoice>> {
    let projects_root = projects_root.as_ref();
    if !projects_root.is_dir() {
        return Err(Error::TemplateDoesNotExistsError {
            template_dir: projects_root.display().to_string(),
        });
    }

    let mut choices = Vec::new();
    for entry in fs::read_dir(projects_root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let config = get_config(entry.path(), &name)?;
        choices.push(TemplateChoice { description: config.description.unwrap_or_default(), name });
    }

    choices.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(choices)
}

/// Templates embedded in the binary at compile time.
static BUNDLED_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Directory holding `projects/` and `configs/` for one run.
#[derive(Debug)]
pub enum TemplatesDir {
    /// Directory given with `--templates-dir`
    Custom(PathBuf),
    /// Bundled templates unpacked for the lifetime of the value
    Bundled(TempDir),
}

impl TemplatesDir {
    /// Uses `custom` when given, otherwise unpacks the bundled templates.
    pub fn resolve(custom: Option<PathBuf>) -> Result<Self> {
        match custom {
            Some(path) => Ok(Self::Custom(path)),
            None => extract_bundled_templates().map(Self::Bundled),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Custom(path) => path,
            Self::Bundled(dir) => dir.path(),
        }
    }
}

/// Unpacks the bundled templates into a new temporary directory.
pub fn extract_bundled_templates() -> Result<TempDir> {
    let dir = tempfile::Builder::new().prefix("create-kang-app-").tempdir()?;
    BUNDLED_TEMPLATES.extract(dir.path())?;
    debug!("Unpacked bundled templates to {}", dir.path().display());
    Ok(dir)
}

/// `<templates>/projects`
pub fn projects_dir<P: AsRef<Path>>(templates_dir: P) -> PathBuf {
    templates_dir.as_ref().join(PROJECTS_DIR)
}

/// `<templates>/configs`
pub fn configs_dir<P: AsRef<Path>>(templates_dir: P) -> PathBuf {
    templates_dir.as_ref().join(CONFIGS_DIR)
}
