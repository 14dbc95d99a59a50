//! Error handling for the Strata application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for Strata operations.
///
/// Only a few of these abort a run. Most are reported by the caller and the
/// composition carries on with the next file, parent or template, see
/// [`Error::is_fatal`].
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A YAML document (config or data) could not be parsed.
    #[error("Failed to parse '{path}': {source}.")]
    YamlError {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("Template '{name}' does not exist in '{template_root}'. Available templates: {}.", .available.join(", "))]
    TemplateNotFound { name: String, template_root: String, available: Vec<String> },

    /// The resolved template path contains a character used by the expansion syntax.
    #[error("Template path '{path}' contains reserved character '{character}'.")]
    ReservedCharacter { path: String, character: char },

    /// Malformed expansion syntax.
    #[error("Syntax error in '{target}': {source}.")]
    ExpansionSyntaxError {
        target: String,
        #[source]
        source: minijinja::Error,
    },

    /// Reference to a data key that is not defined.
    #[error("Undefined data reference in '{target}': {source}.")]
    UndefinedDataError {
        target: String,
        #[source]
        source: minijinja::Error,
    },

    /// Any other failure raised while expanding text.
    #[error("Expansion failed for '{target}': {source}.")]
    ExpansionError {
        target: String,
        #[source]
        source: minijinja::Error,
    },

    /// Represents errors that occur during hook script execution
    #[error("Hook execution error: {0}.")]
    HookError(String),

    #[error("Prompt error: {0}.")]
    PromptError(String),

    #[error("Interrupted by user.")]
    Interrupted,
}

impl Error {
    /// Whether the error must abort the whole run rather than being reported.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::TemplateNotFound { .. }
                | Error::ExpansionSyntaxError { .. }
                | Error::UndefinedDataError { .. }
                | Error::ExpansionError { .. }
                | Error::HookError(_)
        )
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        match err {
            dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => {
                Error::Interrupted
            }
            dialoguer::Error::IO(e) => Error::PromptError(e.to_string()),
        }
    }
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// An interrupt is not a failure: it prints an abort message and exits with 0.
pub fn default_error_handler(err: Error) {
    match err {
        Error::Interrupted => {
            eprintln!("Aborted.");
            std::process::exit(0);
        }
        err => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
