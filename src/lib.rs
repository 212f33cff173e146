//! create-kang-app scaffolds a new project from a static template, installs
//! its dependencies and optionally sets up and runs lint tooling.
//! The work is done by a provisioning pipeline of ordered stages sharing one
//! context, where optional stages may fail without aborting the run.

/// Command-line interface module
pub mod cli;

/// Per-template manifests (template.json, template.yml, template.yaml)
pub mod config;

/// Shared file names and directory layout
pub mod constants;

/// Glob-driven file copy and file writing
pub mod copy;

/// Error types and handling
pub mod error;

/// Process invocation for package managers and lint binaries
pub mod gateway;

/// File ignore patterns
/// Processes .kangignore files to exclude specific paths
pub mod ignore;

/// Logging setup
pub mod logger;

/// Sequential stage runner with skippable stages
pub mod pipeline;

/// User input and interaction handling
pub mod prompt;

/// The provisioning stages: copy template, install, add lint config, run lint
pub mod provisioner;

/// `%TOKEN%` substitution
pub mod renderer;

/// Final summary and progress output
pub mod reporter;

/// Plain versus marked template file selection
pub mod selector;

/// Template catalog
pub mod template;

/// Package manager and lint command table
pub mod tooling;

/// Project variables substituted into marked files
pub mod variables;
