//! Common constants used throughout templatedir.

/// Suffix marking an entry as a template
pub const TEMPLATE_SUFFIX: &str = ".template";

/// Directory name holding variable-definition templates
pub const VARS_DIR: &str = "vars";

/// Environment variables consulted for the default arguments
pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_WORKSPACE: &str = "GITHUB_WORKSPACE";
pub const AUTHOR_FALLBACKS: [&str; 3] = ["GITHUB_ACTOR", "USER", "USERNAME"];

/// Upper bound on concurrent render workers
pub const MAX_JOBS: usize = 256;
