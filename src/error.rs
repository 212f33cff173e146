//! Error handling for create-kang-app.
//! Defines the error taxonomy shared by the substitution engine, the copy
//! primitive, the process gateway and the provisioning pipeline.

use std::io;
use thiserror::Error;

/// Custom error types for create-kang-app operations.
///
/// Errors raised by a non-skippable stage abort the pipeline and reach `main`
/// unchanged. Errors raised by a skippable stage are captured into the
/// pipeline context instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A template references a token that has no value in the variable set.
    #[error("Template variable '%{token}%' is not defined.")]
    UndefinedVariable { token: String },

    /// A file could not be copied or written while materializing a template.
    #[error("Failed to write '{path}': {source}.")]
    CopyFailure {
        path: String,
        #[source]
        source: io::Error,
    },

    /// An external command could not be started or exited unsuccessfully.
    #[error("Command '{command}' failed: {reason}.")]
    ProcessFailure { command: String, reason: String },

    #[error("Template directory '{template_dir}' does not exist.")]
    TemplateDoesNotExistsError { template_dir: String },

    /// Represents errors that occur during template processing
    #[error("Template error: {0}.")]
    TemplateError(String),

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Invalid include, exclude or ignore glob.
    #[error("Invalid glob pattern: {0}.")]
    GlobError(#[from] globset::Error),

    #[error("Prompt error: {0}.")]
    PromptError(#[from] dialoguer::Error),

    /// A pipeline context key was written with a value of a different kind.
    #[error("Context key '{key}' already holds a {existing} value.")]
    ContextTypeMismatch { key: String, existing: &'static str },
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
