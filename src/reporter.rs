//! Final summary and progress output.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::pipeline::{PipelineContext, PipelineObserver, StageReport, StageState};
use crate::template::Template;
use crate::tooling::PackageManager;

/// What the operator needs to start working on the generated project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Project path relative to the current directory, empty when they match
    pub relative_project_path: String,
    pub dev_command: Option<String>,
}

impl Summary {
    /// Command line shown to the operator, if any.
    pub fn next_step(&self) -> Option<String> {
        match (self.relative_project_path.is_empty(), &self.dev_command) {
            (true, Some(command)) => Some(command.clone()),
            (false, Some(command)) => Some(format!("cd {} && {}", self.relative_project_path, command)),
            (false, None) => Some(format!("cd {}", self.relative_project_path)),
            (true, None) => None,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "🎉 The project was created successfully.")?;
        if let Some(step) = self.next_step() {
            writeln!(f)?;
            writeln!(f, "To start working on it, run:")?;
            writeln!(f)?;
            writeln!(f, "  {step}")?;
        }
        Ok(())
    }
}

/// Builds the final summary from the pipeline context.
///
/// The package manager reported is the first of `requested` whose install
/// succeeded. Only runnable templates get a dev command.
pub fn summarize(
    context: &PipelineContext,
    template: &Template,
    requested: &[PackageManager],
    relative_project_path: &str,
) -> Summary {
    let succeeded = requested
        .iter()
        .copied()
        .find(|package_manager| context.flag(package_manager.as_str()) == Some(true));

    Summary {
        relative_project_path: relative_project_path.to_string(),
        dev_command: succeeded.and_then(|package_manager| template.dev_command(package_manager)),
    }
}

/// Lexical path of `project_dir` as seen from `cwd`. Both paths are
/// expected to be absolute.
pub fn relative_project_path<P: AsRef<Path>, Q: AsRef<Path>>(cwd: P, project_dir: Q) -> String {
    let cwd: Vec<Component> = cwd.as_ref().components().collect();
    let project: Vec<Component> = project_dir.as_ref().components().collect();

    let common = cwd.iter().zip(&project).take_while(|(a, b)| a == b).count();
    let mut relative = PathBuf::new();
    for _ in common..cwd.len() {
        relative.push("..");
    }
    for component in &project[common..] {
        relative.push(component.as_os_str());
    }

    relative.display().to_string()
}

/// Prints one line per stage transition.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn new() -> Self {
        Self
    }
}

impl PipelineObserver for ConsoleObserver {
    fn on_report(&mut self, report: &StageReport) {
        match report.state {
            StageState::Enabled => println!("  ... {}", report.title),
            StageState::Succeeded => println!("  ✔ {}", report.title),
            StageState::Skipped => println!(
                "  ↓ {} [skipped: {}]",
                report.title,
                report.error_detail.as_deref().unwrap_or("unknown reason")
            ),
            StageState::Failed => println!("  ✖ {}", report.title),
        }
    }
}
