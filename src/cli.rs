//! Command-line interface implementation for templatedir.
//! Provides argument parsing using clap.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for templatedir.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "templatedir: render the templates of a directory in place",
    long_about = None,
    disable_version_flag = true
)]
pub struct Args {
    /// Directory holding the templates, defaults to the current directory
    #[arg(value_name = "TARGET_DIR")]
    pub target_dir: Option<PathBuf>,

    /// Render into this directory instead of replacing templates in place
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// JSON or YAML file with extra arguments, merged over the defaults
    #[arg(short, long, value_name = "FILE")]
    pub args_file: Option<PathBuf>,

    /// Read a JSON document with extra arguments from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// Number of files rendered concurrently (at most 256)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Enable verbose logging output
    #[arg(long)]
    pub verbose: bool,

    /// Print version
    #[allow(dead_code)]
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 0 after printing help or version
/// * With clap's default error handling for invalid arguments
pub fn get_args() -> Args {
    Args::parse()
}
