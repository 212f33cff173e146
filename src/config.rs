//! Configuration handling for templates.
//! A template may carry a manifest (`template.json`, `template.yml` or
//! `template.yaml`) describing its kind and lint needs. Templates without a
//! manifest fall back to built-in defaults.

use crate::constants::CONFIG_FILES;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// What a generated project offers once installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Exposes a `run dev` script.
    Runnable,
    /// Exposes no dev command.
    #[default]
    Library,
}

/// Lint-related settings of a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LintConfig {
    /// Lint config files renamed after being copied, source name to target name.
    #[serde(default)]
    pub rename: IndexMap<String, String>,
}

/// Template manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: TemplateKind,
    #[serde(default)]
    pub lint: LintConfig,
}

impl TemplateConfig {
    /// Defaults for templates that ship without a manifest.
    pub fn builtin(template_name: &str) -> Self {
        match template_name {
            "next-ts" => Self {
                description: Some("Next.js + TypeScript".to_string()),
                kind: TemplateKind::Runnable,
                lint: LintConfig::default(),
            },
            "vite-ts" => Self {
                description: Some("React + TypeScript + Vite".to_string()),
                kind: TemplateKind::Runnable,
                lint: LintConfig {
                    rename: IndexMap::from([(
                        ".eslintrc.js".to_string(),
                        ".eslintrc.cjs".to_string(),
                    )]),
                },
            },
            "node-ts" => Self {
                description: Some("Node.js + TypeScript".to_string()),
                ..Self::default()
            },
            "node-js" => Self {
                description: Some("Node.js + JavaScript".to_string()),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }
}

/// Reads the first manifest found in `template_dir`.
///
/// # Returns
/// * `Result<Option<String>>` - Manifest contents, `None` when the template has none
pub fn load_config<P: AsRef<Path>>(template_dir: P, config_files: &[&str]) -> Result<Option<String>> {
    for file in config_files {
        let config_path = template_dir.as_ref().join(file);
        if config_path.is_file() {
            debug!("Loading configuration from {}", config_path.display());
            return Ok(Some(std::fs::read_to_string(&config_path)?));
        }
    }
    Ok(None)
}

/// Parses a manifest, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML
pub fn parse_config(content: &str) -> Result<TemplateConfig> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

/// Returns the configuration of the template `template_name` living in
/// `template_dir`.
pub fn get_config<P: AsRef<Path>>(template_dir: P, template_name: &str) -> Result<TemplateConfig> {
    match load_config(&template_dir, &CONFIG_FILES)? {
        Some(content) => parse_config(&content),
        None => {
            debug!("No manifest for '{template_name}', using built-in defaults");
            Ok(TemplateConfig::builtin(template_name))
        }
    }
}
