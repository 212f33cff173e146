//! Per-project variables substituted into marked template files.

use std::path::Path;

use cruet::Inflector;
use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Ordered mapping from lowercase token name to replacement value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    values: IndexMap<String, String>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the variables for a project living in `project_dir`.
    ///
    /// `name` is the kebab-case slug of the directory name and `description`
    /// is derived from it.
    pub fn for_project<P: AsRef<Path>>(project_dir: P) -> Result<Self> {
        let project_dir = project_dir.as_ref();
        let dir_name = project_dir.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
            Error::ConfigError(format!(
                "cannot derive a project name from '{}'",
                project_dir.display()
            ))
        })?;

        let name = package_name(dir_name);
        if name.is_empty() {
            return Err(Error::ConfigError(format!(
                "project name derived from '{dir_name}' is empty"
            )));
        }

        let description = format!("{name} 프로젝트입니다.");
        let mut variables = Self::new();
        variables.insert("name", name);
        variables.insert("description", description);
        Ok(variables)
    }

    /// Inserts a value, normalizing the key to lowercase.
    pub fn insert<K: AsRef<str>, V: Into<String>>(&mut self, key: K, value: V) -> Option<String> {
        self.values.insert(key.as_ref().to_ascii_lowercase(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut variables = Self::new();
        for (key, value) in iter {
            variables.insert(key, value);
        }
        variables
    }
}

/// Converts a directory name into an npm-compatible package name.
pub fn package_name(dir_name: &str) -> String {
    dir_name.to_kebab_case()
}
