//! Lazy traversal of a template tree.
//!
//! [`walk_dir`] starts a producer thread that walks the source tree
//! depth-first, children of each directory in name order, and sends the
//! relative path of every non-directory entry on a channel. A traversal
//! failure is reported once on a second channel after the paths already sent;
//! those paths remain valid. Consumers drain [`Walk::paths`] first, then call
//! [`Walk::finish`].
//!
//! Symbolic links are listed as plain entries and never descended into.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::Scope;

use log::debug;

use crate::error::{Error, Result};
use crate::fs::{join, ReadFs};

/// Handle on a running walk.
pub struct Walk {
    paths: Receiver<String>,
    status: WalkStatus,
}

/// Terminal status of a walk, split from its paths by [`Walk::into_parts`].
pub struct WalkStatus {
    outcome: Receiver<Result<()>>,
}

impl Walk {
    /// Blocking iterator over the emitted paths. Ends when the walk completes
    /// or stops on an error.
    pub fn paths(&self) -> mpsc::Iter<'_, String> {
        self.paths.iter()
    }

    /// Splits the walk into an owned, `Send` iterator over its paths and its
    /// terminal status. Dropping the iterator early cancels the walk.
    pub fn into_parts(self) -> (mpsc::IntoIter<String>, WalkStatus) {
        (self.paths.into_iter(), self.status)
    }

    /// Terminal status of the walk. Waits for the producer if it is still
    /// running.
    ///
    /// Paths not drained yet are discarded. If that stops the producer before
    /// it reached the end of the tree, the result is `Error::WalkCancelled`.
    pub fn finish(self) -> Result<()> {
        drop(self.paths);
        self.status.finish()
    }
}

impl WalkStatus {
    /// Waits for the producer and returns how the walk ended.
    pub fn finish(self) -> Result<()> {
        self.outcome.recv().unwrap_or(Err(Error::WalkCancelled))
    }
}

/// Starts walking `fs` from its root on a thread of `scope`.
///
/// Dropping the returned [`Walk`] stops the producer at its next send.
pub fn walk_dir<'scope, F>(scope: &'scope Scope<'scope, '_>, fs: &'scope F) -> Walk
where
    F: ReadFs + ?Sized,
{
    let (path_tx, paths) = mpsc::channel();
    let (outcome_tx, outcome) = mpsc::channel();

    scope.spawn(move || {
        let result = match visit(fs, "", &path_tx) {
            Ok(()) => {
                debug!("Walk completed.");
                Ok(())
            }
            Err(Stop::Cancelled) => {
                debug!("Walk cancelled by its consumer.");
                Err(Error::WalkCancelled)
            }
            Err(Stop::Failed(err)) => Err(err),
        };
        // Paths go out before the outcome is signalled.
        drop(path_tx);
        let _ = outcome_tx.send(result);
    });

    Walk { paths, status: WalkStatus { outcome } }
}

enum Stop {
    Cancelled,
    Failed(Error),
}

fn visit<F: ReadFs + ?Sized>(
    fs: &F,
    dir: &str,
    paths: &Sender<String>,
) -> std::result::Result<(), Stop> {
    let entries = fs.read_dir(dir).map_err(|source| {
        Stop::Failed(Error::TraversalError { path: dir.to_string(), source })
    })?;

    for entry in entries {
        let path = join(dir, &entry.name);
        if entry.is_dir {
            visit(fs, &path, paths)?;
        } else {
            paths.send(path).map_err(|_| Stop::Cancelled)?;
        }
    }
    Ok(())
}
