//! Token substitution for marked template files.
//! Replaces `%TOKEN%` markers with values from a [`VariableSet`].
use regex::Regex;

use crate::error::{Error, Result};
use crate::variables::VariableSet;

/// Pattern of a substitution token. Identifiers are ASCII word characters.
const TOKEN_PATTERN: &str = r"%([A-Za-z0-9_]+)%";

/// Trait for template rendering engines.
///
/// Implementations must be shareable across threads because marked files are
/// rendered concurrently.
pub trait TemplateRenderer: Sync {
    /// Renders a template string with the given variables.
    ///
    /// # Arguments
    /// * `source` - Template string to render
    /// * `variables` - Values for the tokens referenced by `source`
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, source: &str, variables: &VariableSet) -> Result<String>;
}

/// `%TOKEN%` rendering engine.
pub struct TokenRenderer {
    /// Compiled token pattern
    pattern: Regex,
}

impl TokenRenderer {
    /// Creates a new TokenRenderer instance.
    pub fn new() -> Self {
        let pattern = Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex");
        Self { pattern }
    }
}

impl Default for TokenRenderer {
    fn default() -> Self {
        TokenRenderer::new()
    }
}

impl TemplateRenderer for TokenRenderer {
    /// Renders a template string by replacing every token.
    ///
    /// Lookup is case-insensitive: `%NAME%`, `%Name%` and `%name%` all read
    /// the `name` variable.
    ///
    /// # Errors
    /// * `Error::UndefinedVariable` if a token has no value
    fn render(&self, source: &str, variables: &VariableSet) -> Result<String> {
        let mut rendered = String::with_capacity(source.len());
        let mut last = 0;

        for captures in self.pattern.captures_iter(source) {
            let (Some(whole), Some(identifier)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let key = identifier.as_str().to_ascii_lowercase();
            let value = variables.get(&key).ok_or_else(|| Error::UndefinedVariable {
                token: identifier.as_str().to_string(),
            })?;

            rendered.push_str(&source[last..whole.start()]);
            rendered.push_str(value);
            last = whole.end();
        }
        rendered.push_str(&source[last..]);

        Ok(rendered)
    }
}
