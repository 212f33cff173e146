//! Command-line interface implementation for create-kang-app.
//! Provides argument parsing and help text formatting using clap.

use clap::Parser;
use std::path::{Component, Path, PathBuf};

use crate::constants::TEMPLATES_DIR_ENV;
use crate::tooling::PackageManager;

/// Command-line arguments structure for create-kang-app.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "create-kang-app: scaffold, install and lint a new project",
    long_about = None,
    after_help = "Examples:\n  create-kang-app my-app\n  create-kang-app my-app --template next-ts"
)]
pub struct Args {
    /// Directory where the project will be created (defaults to the current directory)
    #[arg(value_name = "PROJECT_DIRECTORY", default_value = ".")]
    pub project_directory: PathBuf,

    /// Template to use (next-ts, vite-ts, ...); prompted for when omitted
    #[arg(short, long)]
    pub template: Option<String>,

    /// Package manager installing the dependencies; prompted for when omitted
    #[arg(short, long, value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Add ESLint and Prettier without asking
    #[arg(long, conflicts_with = "no_lint")]
    pub lint: bool,

    /// Skip the lint setup without asking
    #[arg(long)]
    pub no_lint: bool,

    /// Directory containing `projects/` and `configs/`
    #[arg(long, value_name = "DIR", env = TEMPLATES_DIR_ENV)]
    pub templates_dir: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Lint choice given on the command line, `None` when the user must be asked.
    pub fn lint_choice(&self) -> Option<bool> {
        match (self.lint, self.no_lint) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Absolute project directory, resolved against `cwd`.
    pub fn project_dir<P: AsRef<Path>>(&self, cwd: P) -> PathBuf {
        resolve_project_dir(cwd, &self.project_directory)
    }
}

/// Joins `input` onto `cwd` and normalizes `.` and `..` lexically.
pub fn resolve_project_dir<P: AsRef<Path>, Q: AsRef<Path>>(cwd: P, input: Q) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in cwd.as_ref().join(input.as_ref()).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for argument errors
pub fn get_args() -> Args {
    Args::parse()
}
