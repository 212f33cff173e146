//! Command table for the external tools a generated project is set up with.
//! Command names and flags live here; the stages only look them up.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

/// Supported package managers, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    pub const ALL: [PackageManager; 3] = [Self::Npm, Self::Yarn, Self::Pnpm];

    /// Executable name, also used as the pipeline context key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        }
    }

    pub fn install_args(&self) -> Vec<&'static str> {
        vec!["install"]
    }

    /// Arguments adding `packages` as development dependencies.
    pub fn add_dev_args<'a>(&self, packages: &[&'a str]) -> Vec<&'a str> {
        let subcommand = match self {
            Self::Npm => "install",
            Self::Yarn | Self::Pnpm => "add",
        };
        let mut args = vec![subcommand, "-D"];
        args.extend_from_slice(packages);
        args
    }

    pub fn dev_command(&self) -> String {
        format!("{} run dev", self.as_str())
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Development dependencies added when lint is requested.
pub const LINT_DEV_DEPENDENCIES: [&str; 7] = [
    "eslint",
    "prettier",
    "eslint-config-prettier",
    "eslint-plugin-prettier",
    "eslint-plugin-import",
    "@typescript-eslint/eslint-plugin",
    "@typescript-eslint/parser",
];

/// Lint configuration files copied from `<templates>/configs`.
pub const LINT_CONFIG_FILES: [&str; 2] = [".eslintrc.js", ".prettierrc"];

/// A lint binary installed in the project's `node_modules/.bin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LintTool {
    pub binary: &'static str,
    pub args: &'static [&'static str],
}

impl LintTool {
    pub fn binary_path<P: AsRef<Path>>(&self, project_dir: P) -> PathBuf {
        project_dir.as_ref().join("node_modules").join(".bin").join(self.binary)
    }
}

/// Lint tools run over the project, in order.
pub const LINT_TOOLS: [LintTool; 2] = [
    LintTool { binary: "eslint", args: &["--fix", "."] },
    LintTool { binary: "prettier", args: &["--write", "."] },
];
