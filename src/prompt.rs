//! User input and interaction handling.
//! Every question is asked through [`Prompter`] so runs can be scripted.

use dialoguer::{Confirm, Select};

use crate::error::{Error, Result};
use crate::template::TemplateChoice;
use crate::tooling::PackageManager;

pub trait Prompter {
    /// Asks the user to pick one of `items`; returns its index.
    fn select(&self, message: &str, items: &[String], default: usize) -> Result<usize>;

    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}

/// Terminal prompts backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn select(&self, message: &str, items: &[String], default: usize) -> Result<usize> {
        Ok(Select::new().with_prompt(message).default(default).items(items).interact()?)
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new().with_prompt(message).default(default).interact()?)
    }
}

/// Asks which template to use.
pub fn choose_template(prompt: &dyn Prompter, choices: &[TemplateChoice]) -> Result<String> {
    if choices.is_empty() {
        return Err(Error::TemplateError("no templates are available".to_string()));
    }
    let items: Vec<String> = choices.iter().map(ToString::to_string).collect();
    let index = prompt.select("Select a template", &items, 0)?;
    choices
        .get(index)
        .map(|choice| choice.name.clone())
        .ok_or_else(|| Error::TemplateError(format!("invalid template selection {index}")))
}

/// Asks which package manager installs the dependencies.
pub fn choose_package_manager(prompt: &dyn Prompter) -> Result<PackageManager> {
    let items: Vec<String> = PackageManager::ALL.iter().map(ToString::to_string).collect();
    let index = prompt.select("Select a package manager", &items, 0)?;
    PackageManager::ALL
        .get(index)
        .copied()
        .ok_or_else(|| Error::ConfigError(format!("invalid package manager selection {index}")))
}

/// Asks whether ESLint and Prettier should be set up. Defaults to yes.
pub fn confirm_lint(prompt: &dyn Prompter) -> Result<bool> {
    prompt.confirm("Add lint configuration (ESLint, Prettier)?", true)
}
