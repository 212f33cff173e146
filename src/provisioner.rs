//! Provisioning stages.
//!
//! Builds the four stages that turn a template into an installed, linted
//! project and runs them through a [`Pipeline`].
//!
//! Context write set:
//! - `template-files`: `Count` of files materialized by Copy Template
//! - `<package manager>`: `Flag` outcome of Install Dependencies
//! - `lint-config`: `Flag` outcome of Add Lint Config
//! - `lint`: `Flag` outcome of Run Lint

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use log::{debug, info};

use crate::config::TemplateConfig;
use crate::copy::{copy, copy_failure, write_file};
use crate::error::{Error, Result};
use crate::gateway::ProcessGateway;
use crate::ignore::{build_globset, parse_ignore_file};
use crate::pipeline::{ContextValue, Pipeline, PipelineContext, PipelineObserver, Stage};
use crate::renderer::TemplateRenderer;
use crate::selector::{list_files, partition, TemplateFile};
use crate::template::Template;
use crate::tooling::{PackageManager, LINT_CONFIG_FILES, LINT_DEV_DEPENDENCIES, LINT_TOOLS};
use crate::variables::VariableSet;

pub const TEMPLATE_FILES_KEY: &str = "template-files";
pub const LINT_CONFIG_KEY: &str = "lint-config";
pub const LINT_KEY: &str = "lint";

/// Everything a run needs, collected before the pipeline starts.
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    pub template: Template,
    pub project_dir: PathBuf,
    /// Directory holding the shared lint configuration files
    pub configs_dir: PathBuf,
    pub package_manager: PackageManager,
    pub lint: bool,
    pub variables: VariableSet,
}

/// Builds the provisioning stages for `plan`, in execution order.
pub fn build_stages<'a>(
    plan: &'a ProvisionPlan,
    renderer: &'a dyn TemplateRenderer,
    gateway: &'a dyn ProcessGateway,
) -> Vec<Stage<'a>> {
    let lint = plan.lint;
    let package_manager = plan.package_manager;

    vec![
        Stage::new("Copying template", move |context: &mut PipelineContext| {
            let written =
                copy_template(&plan.template, &plan.project_dir, renderer, &plan.variables)?;
            context.insert(TEMPLATE_FILES_KEY, ContextValue::Count(written))
        }),
        Stage::new(format!("Installing dependencies with {package_manager}"), move |_| {
            install_dependencies(gateway, package_manager, &plan.project_dir)
        })
        .skippable()
        .records_outcome(package_manager.as_str()),
        Stage::new("Adding lint configuration", move |_| {
            add_lint_config(
                gateway,
                package_manager,
                &plan.configs_dir,
                &plan.project_dir,
                plan.template.config(),
            )
        })
        .skippable()
        .enabled_when(move || lint)
        .records_outcome(LINT_CONFIG_KEY),
        Stage::new("Running lint", move |_| run_lint(gateway, &plan.project_dir))
            .skippable()
            .enabled_when(move || lint)
            .records_outcome(LINT_KEY),
    ]
}

/// Runs every provisioning stage of `plan`.
///
/// # Errors
/// The error of Copy Template, the only stage that cannot be skipped.
pub fn provision(
    plan: &ProvisionPlan,
    renderer: &dyn TemplateRenderer,
    gateway: &dyn ProcessGateway,
    observer: &mut dyn PipelineObserver,
) -> Result<PipelineContext> {
    info!(
        "Provisioning '{}' from template '{}'",
        plan.project_dir.display(),
        plan.template.name()
    );
    Pipeline::new(build_stages(plan, renderer, gateway)).run(observer)
}

/// Materializes `template` into `destination`.
///
/// Plain files are copied verbatim. Marked files are rendered with
/// `variables` and written under their rendered name.
///
/// # Returns
/// * `Result<usize>` - Number of files written
///
/// # Errors
/// * `Error::UndefinedVariable` if a marked file uses an unknown token
/// * `Error::TemplateError` if two files would be written to the same path
/// * `Error::CopyFailure` if a file cannot be read, copied or written
pub fn copy_template(
    template: &Template,
    destination: &Path,
    renderer: &dyn TemplateRenderer,
    variables: &VariableSet,
) -> Result<usize> {
    let root = template.root();
    let ignore_patterns = parse_ignore_file(root)?;
    let ignored = build_globset(&ignore_patterns)?;

    let files = list_files(root)?
        .into_iter()
        .filter(|file| !ignored.is_match(file.relative_path()));
    let (plain, marked) = partition(files);
    debug!("{} plain and {} marked files", plain.len(), marked.len());
    check_rendered_paths(&plain, &marked)?;

    let mut patterns = vec!["**/*".to_string()];
    patterns.extend(ignore_patterns.iter().map(|pattern| format!("!{pattern}")));
    patterns.extend(marked.iter().map(|file| {
        format!("!{}", globset::escape(&file.relative_path().to_string_lossy()))
    }));

    let copied = copy(root, &patterns, destination)?;
    let rendered = render_marked_files(root, &marked, destination, renderer, variables)?;

    Ok(copied.len() + rendered.len())
}

/// Fails unless every marked file renders to a path of its own.
///
/// Marked files are written concurrently, so two of them sharing a target,
/// or one landing on a plain file, is rejected before anything is written.
fn check_rendered_paths(plain: &[TemplateFile], marked: &[TemplateFile]) -> Result<()> {
    let plain_paths: HashSet<&Path> = plain.iter().map(TemplateFile::relative_path).collect();
    let mut targets: HashMap<PathBuf, &Path> = HashMap::new();

    for file in marked {
        let target = file.rendered_relative_path()?;
        if plain_paths.contains(target.as_path()) {
            return Err(Error::TemplateError(format!(
                "'{}' renders onto the plain file '{}'",
                file.relative_path().display(),
                target.display()
            )));
        }
        if let Some(previous) = targets.insert(target.clone(), file.relative_path()) {
            return Err(Error::TemplateError(format!(
                "'{}' and '{}' both render to '{}'",
                previous.display(),
                file.relative_path().display(),
                target.display()
            )));
        }
    }
    Ok(())
}

/// Renders marked files concurrently and waits for all of them.
///
/// When several files fail, the error of the first one in path order is
/// returned.
fn render_marked_files(
    template_root: &Path,
    marked: &[TemplateFile],
    destination: &Path,
    renderer: &dyn TemplateRenderer,
    variables: &VariableSet,
) -> Result<Vec<PathBuf>> {
    let results: Vec<Result<PathBuf>> = thread::scope(|scope| {
        let workers: Vec<_> = marked
            .iter()
            .map(|file| {
                scope.spawn(move || {
                    render_marked_file(template_root, file, destination, renderer, variables)
                })
            })
            .collect();

        workers
            .into_iter()
            .zip(marked)
            .map(|(worker, file)| {
                worker.join().unwrap_or_else(|_| {
                    Err(Error::TemplateError(format!(
                        "rendering '{}' panicked",
                        file.relative_path().display()
                    )))
                })
            })
            .collect()
    });

    results.into_iter().collect()
}

fn render_marked_file(
    template_root: &Path,
    file: &TemplateFile,
    destination: &Path,
    renderer: &dyn TemplateRenderer,
    variables: &VariableSet,
) -> Result<PathBuf> {
    let source_path = template_root.join(file.relative_path());
    let source = fs::read_to_string(&source_path).map_err(|e| copy_failure(&source_path, e))?;
    let rendered = renderer.render(&source, variables)?;

    let target = destination.join(file.rendered_relative_path()?);
    debug!("Writing file: {}", target.display());
    write_file(&rendered, &target)?;
    Ok(target)
}

/// Runs `<package manager> install` in the project.
pub fn install_dependencies(
    gateway: &dyn ProcessGateway,
    package_manager: PackageManager,
    project_dir: &Path,
) -> Result<()> {
    gateway.spawn(package_manager.as_str(), &package_manager.install_args(), project_dir)
}

/// Adds lint dev dependencies, copies the lint config files into the
/// project and applies the template's rename table.
pub fn add_lint_config(
    gateway: &dyn ProcessGateway,
    package_manager: PackageManager,
    configs_dir: &Path,
    project_dir: &Path,
    config: &TemplateConfig,
) -> Result<()> {
    gateway.spawn(
        package_manager.as_str(),
        &package_manager.add_dev_args(&LINT_DEV_DEPENDENCIES[..]),
        project_dir,
    )?;

    let copied = copy(configs_dir, &LINT_CONFIG_FILES[..], project_dir)?;
    if copied.len() != LINT_CONFIG_FILES.len() {
        return Err(Error::TemplateError(format!(
            "expected {} in '{}'",
            LINT_CONFIG_FILES.join(", "),
            configs_dir.display()
        )));
    }

    for (from, to) in &config.lint.rename {
        let source = project_dir.join(from);
        let target = project_dir.join(to);
        debug!("Renaming {} to {}", source.display(), target.display());
        fs::rename(&source, &target).map_err(|e| copy_failure(&source, e))?;
    }

    Ok(())
}

/// Runs every lint tool from the project's `node_modules/.bin`, in order.
pub fn run_lint(gateway: &dyn ProcessGateway, project_dir: &Path) -> Result<()> {
    for tool in LINT_TOOLS {
        let binary = tool.binary_path(project_dir);
        gateway.spawn(&binary.to_string_lossy(), tool.args, project_dir)?;
    }
    Ok(())
}
