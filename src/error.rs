//! Error handling for templatedir.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use thiserror::Error;

/// Errors that can occur while rendering a template directory.
///
/// Every variant raised while handling a single entry carries the relative
/// path of that entry, so the message printed by the CLI points at the
/// offending file.
#[derive(Error, Debug)]
pub enum Error {
    /// The walker could not list a directory of the source tree.
    #[error("Cannot traverse '{path}': {source}.")]
    TraversalError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A source entry could not be read.
    #[error("Cannot read '{path}': {source}.")]
    ReadError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The name or the content of a template could not be rendered.
    #[error("Cannot render '{path}': {source}")]
    RenderError {
        path: String,
        #[source]
        source: Box<Error>,
    },

    /// The rendered name of a template is not a usable relative path.
    #[error("Template '{path}' renders to an invalid path '{rendered}'.")]
    InvalidRenderedPath { path: String, rendered: String },

    /// An ancestor directory of a destination entry could not be created.
    #[error("Cannot create directory '{path}': {source}.")]
    DirectoryCreateError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A destination entry could not be written.
    #[error("Cannot write '{path}': {source}.")]
    WriteError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A marked entry could not be removed from the destination after its
    /// rendered counterpart was written.
    #[error("Cannot remove '{path}': {source}.")]
    RemoveError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Error raised by the MiniJinja engine.
    #[error("{0}.")]
    MinijinjaError(#[from] minijinja::Error),

    /// The directory to render does not exist.
    #[error("Template directory '{0}' does not exist.")]
    TemplateDirNotFound(String),

    /// The argument mapping could not be built or parsed.
    #[error("Arguments error: {0}.")]
    ArgumentsError(String),

    /// Any other filesystem error.
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// The walk was stopped by its consumer before reaching the end of the tree.
    #[error("Walk cancelled before completion.")]
    WalkCancelled,

    /// The render thread pool could not be started.
    #[error("Cannot start render workers: {0}.")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Relative path of the entry the error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::TraversalError { path, .. }
            | Error::ReadError { path, .. }
            | Error::RenderError { path, .. }
            | Error::InvalidRenderedPath { path, .. }
            | Error::DirectoryCreateError { path, .. }
            | Error::WriteError { path, .. }
            | Error::RemoveError { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("Fatal error: {err}");
    std::process::exit(1);
}
