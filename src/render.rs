//! Tree render orchestration.
//!
//! The walker feeds paths to a rayon pool running the [`Processor`]. The
//! first error wins: no new file is taken once a file has failed, the files
//! already taken finish and the error is returned to the caller.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::thread;

use log::{info, warn};
use rayon::prelude::*;

use crate::constants::MAX_JOBS;
use crate::error::Result;
use crate::fs::{ReadFs, WriteFs};
use crate::processor::{FileKind, Outcome, Processor};
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::walker::walk_dir;

/// Tuning of a tree render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Number of files rendered concurrently, clamped to `1..=MAX_JOBS`.
    pub jobs: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        let jobs = thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1);
        Self { jobs }
    }
}

/// Counts of the files handled by a successful render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub copied: usize,
    pub rendered: usize,
    pub variables: usize,
}

impl Summary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Copied { .. } => self.copied += 1,
            Outcome::Rendered { kind: FileKind::Variables, .. } => self.variables += 1,
            Outcome::Rendered { .. } => self.rendered += 1,
            Outcome::SkippedDirectory => {}
        }
    }

    /// Total number of files written.
    pub fn total(&self) -> usize {
        self.copied + self.rendered + self.variables
    }
}

/// Renders the tree of `source` into `dest` with the MiniJinja engine and
/// default options.
///
/// `source` and `dest` may be the same tree: templates are then replaced in
/// place by their rendered counterparts.
pub fn render_to<S, D>(source: &S, dest: &D, args: &serde_json::Value) -> Result<()>
where
    S: ReadFs + ?Sized,
    D: WriteFs + ?Sized,
{
    let engine = MiniJinjaRenderer::new();
    render_to_with(source, dest, &engine, args, &RenderOptions::default()).map(|_| ())
}

/// Renders the tree of `source` into `dest` using `engine`.
///
/// # Returns
/// * `Result<Summary>` - Counts of copied and rendered files
///
/// # Errors
/// The first error raised by the walker or by any file, with the offending
/// path in its message.
pub fn render_to_with<S, D>(
    source: &S,
    dest: &D,
    engine: &dyn TemplateRenderer,
    args: &serde_json::Value,
    options: &RenderOptions,
) -> Result<Summary>
where
    S: ReadFs + ?Sized,
    D: WriteFs + ?Sized,
{
    let jobs = options.jobs.clamp(1, MAX_JOBS);
    info!("Rendering template tree with {} worker(s).", jobs);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    let processor = Processor::new(source, dest, engine, args);
    let summary = Mutex::new(Summary::default());

    thread::scope(|scope| {
        let (paths, status) = walk_dir(scope, source).into_parts();
        let rendered = pool.install(|| {
            paths.par_bridge().try_for_each(|path| -> Result<()> {
                let outcome = processor.process(&path)?;
                if let Ok(mut summary) = summary.lock() {
                    summary.record(&outcome);
                }
                Ok(())
            })
        });
        // The paths iterator is gone here, which stops the walker after an error.
        rendered.and_then(|()| status.finish())
    })
    .inspect_err(|err| warn!("Rendering cancelled after an error: {}", err))?;

    let summary = summary.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
    info!(
        "Rendered {} template(s), {} variables file(s), copied {} file(s).",
        summary.rendered, summary.variables, summary.copied
    );
    Ok(summary)
}
