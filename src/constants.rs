//! Common constants used throughout create-kang-app.

/// Supported template manifest file names, in lookup order
pub const CONFIG_FILES: [&str; 3] = ["template.json", "template.yml", "template.yaml"];

/// Template ignore file name
pub const IGNORE_FILE: &str = ".kangignore";

/// Marker character in a file name that requests rename and substitution
pub const MARKER: char = '_';

/// Directory under the templates root holding project templates
pub const PROJECTS_DIR: &str = "projects";

/// Directory under the templates root holding shared lint configuration
pub const CONFIGS_DIR: &str = "configs";

/// Environment variable overriding the templates root
pub const TEMPLATES_DIR_ENV: &str = "KANG_TEMPLATES_DIR";
