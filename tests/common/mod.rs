#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use create_kang_app::config::TemplateConfig;
use create_kang_app::error::{Error, Result};
use create_kang_app::gateway::ProcessGateway;
use create_kang_app::template::Template;

/// A process invocation seen by [`RecordingGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// Gateway that records invocations instead of spawning processes.
/// Programs whose name ends with one of the `failing` entries fail.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    calls: RefCell<Vec<Call>>,
    failing: HashSet<String>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(programs: &[&str]) -> Self {
        Self {
            calls: RefCell::default(),
            failing: programs.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|call| call.program.clone()).collect()
    }
}

impl ProcessGateway for RecordingGateway {
    fn spawn(&self, program: &str, args: &[&str], cwd: &Path) -> Result<()> {
        self.calls.borrow_mut().push(Call {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        });

        if self.failing.iter().any(|failing| program.ends_with(failing.as_str())) {
            return Err(Error::ProcessFailure {
                command: program.to_string(),
                reason: "exited with exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Writes `files` (relative path, content) under `root`.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// A template rooted at `root` with the built-in defaults of `name`.
pub fn template_at(root: &Path, name: &str) -> Template {
    Template::from_parts(name, root, TemplateConfig::builtin(name))
}

/// Templates directory shipped with the crate.
pub fn bundled_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")
}
