//! Error handling for codebase-kit.
//! Defines the error type and result alias used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for codebase-kit operations.
///
/// This enum represents all possible errors that can occur while loading a template,
/// transforming it and writing the generated project or derived assets.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur while cloning a remote template
    #[error("Git error: {0}.")]
    Git2Error(#[from] git2::Error),

    /// Represents errors in the template manifest when it is JSON
    #[error("Manifest JSON error: {0}.")]
    JSONParseError(#[from] serde_json::Error),

    /// Represents errors in the template manifest when it is YAML
    #[error("Manifest YAML error: {0}.")]
    YAMLParseError(#[from] serde_yaml::Error),

    /// Represents invalid ignore or source-root glob patterns
    #[error("Glob pattern error: {0}.")]
    GlobError(#[from] globset::Error),

    /// Represents a pattern that could not be compiled into a regular expression
    #[error("Pattern error: {0}.")]
    RegexError(#[from] regex::Error),

    /// Represents errors that occur during template traversal
    #[error("Template error: {0}.")]
    TemplateError(String),

    #[error("Template does not exist: {template_dir}.")]
    TemplateDoesNotExistsError { template_dir: String },

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents validation failures in operator input
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// Two entries would end up at the same path after renaming
    #[error("Rename conflict: '{source_path}' would overwrite '{target_path}'.")]
    RenameConflict { source_path: String, target_path: String },

    #[error("Output directory already exists: {output_dir}.")]
    OutputDirectoryExistsError { output_dir: String },

    /// A required external program could not be started
    #[error("Required tool '{tool}' was not found, please install it and retry.")]
    ToolNotFound { tool: String },

    /// An external program exited unsuccessfully
    #[error("Command '{command}' failed: {status}.")]
    CommandError { command: String, status: String },

    /// Represents errors in SVG input for the vector drawable converter
    #[error("SVG error: {0}.")]
    SvgError(String),
}

/// Convenience type alias for Results with Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
