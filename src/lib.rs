//! templatedir renders a template directory into a concrete tree.
//! Files whose name ends with `.template` have their name and content
//! rendered and lose the marker; every other file is copied unchanged.

/// Default argument mapping and argument documents
pub mod args;

/// Command-line interface module for the templatedir application
pub mod cli;

/// Template marker and reserved names
pub mod constants;

/// Error types and handling for the templatedir application
pub mod error;

/// Filesystem capabilities: disk, in-memory and recording implementations
pub mod fs;

pub mod logger;

/// Per-file rendering and cleanup
pub mod processor;

/// Tree render orchestration
pub mod render;

/// Template engine abstraction and its MiniJinja implementation
pub mod renderer;

/// Lazy traversal of the template tree
pub mod walker;

pub use error::{Error, Result};
pub use render::{render_to, render_to_with, RenderOptions, Summary};
