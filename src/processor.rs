//! Per-file rendering: classification, name and content substitution, and
//! the write/cleanup sequence on the destination tree.

use log::debug;

use crate::constants::{TEMPLATE_SUFFIX, VARS_DIR};
use crate::error::{Error, Result};
use crate::fs::{parent, ReadFs, WriteFs};
use crate::renderer::TemplateRenderer;

/// How a source entry is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Copied verbatim, same path.
    Plain,
    /// Name and content rendered, marker dropped.
    Template,
    /// A template under a `vars` directory. Rendered like any other template;
    /// its output is for the user and never read back.
    Variables,
}

/// What happened to a single source entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Written unchanged at the same path.
    Copied { target: String },
    /// Written rendered at the de-marked, substituted path.
    Rendered { target: String, kind: FileKind },
    /// The entry is a directory; directories are implicit.
    SkippedDirectory,
}

/// Returns true when the final segment of `path` carries the template marker.
pub fn is_template_path(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.len() > TEMPLATE_SUFFIX.len() && name.ends_with(TEMPLATE_SUFFIX)
}

/// Returns true when some directory of `path` is a variable-definition directory.
pub fn is_vars_path(path: &str) -> bool {
    let mut segments: Vec<&str> = path.split('/').collect();
    segments.pop();
    segments.contains(&VARS_DIR)
}

pub fn classify(path: &str) -> FileKind {
    if !is_template_path(path) {
        FileKind::Plain
    } else if is_vars_path(path) {
        FileKind::Variables
    } else {
        FileKind::Template
    }
}

/// Strips the template marker from `path`, if present.
pub fn strip_marker(path: &str) -> &str {
    if is_template_path(path) {
        &path[..path.len() - TEMPLATE_SUFFIX.len()]
    } else {
        path
    }
}

/// Checks that a rendered path is a usable relative path: non-empty, no
/// leading or trailing separator, no empty, `.` or `..` segment.
pub fn is_rendered_path_valid(path: &str) -> bool {
    !path.is_empty()
        && path.split('/').all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

/// Renders one source entry into the destination tree.
pub struct Processor<'a, S: ?Sized, D: ?Sized> {
    source: &'a S,
    dest: &'a D,
    engine: &'a dyn TemplateRenderer,
    context: &'a serde_json::Value,
}

impl<'a, S, D> Processor<'a, S, D>
where
    S: ReadFs + ?Sized,
    D: WriteFs + ?Sized,
{
    pub fn new(
        source: &'a S,
        dest: &'a D,
        engine: &'a dyn TemplateRenderer,
        context: &'a serde_json::Value,
    ) -> Self {
        Self { source, dest, engine, context }
    }

    /// Computes where `path` lands in the destination tree. Templates have
    /// their marker stripped and the remaining path rendered.
    pub fn resolve_target_path(&self, path: &str) -> Result<String> {
        if !is_template_path(path) {
            return Ok(path.to_string());
        }
        let rendered = self
            .engine
            .render(path, strip_marker(path), self.context)
            .map_err(|e| Error::RenderError { path: path.to_string(), source: Box::new(e) })?;
        if !is_rendered_path_valid(&rendered) {
            return Err(Error::InvalidRenderedPath { path: path.to_string(), rendered });
        }
        Ok(rendered)
    }

    /// Renders or copies the entry at `path`.
    ///
    /// # Flow
    /// 1. Reads the source bytes
    /// 2. Resolves the target path and renders the content of templates
    /// 3. Creates the ancestors of the target and writes it
    /// 4. For templates, removes the marked entry from the destination
    ///
    /// Nothing is written when rendering fails. The marked entry is removed
    /// only after the rendered one has been written.
    pub fn process(&self, path: &str) -> Result<Outcome> {
        let read_error = |source| Error::ReadError { path: path.to_string(), source };

        if self.source.stat(path).map_err(read_error)?.is_dir {
            debug!("Skipping directory: {}", path);
            return Ok(Outcome::SkippedDirectory);
        }
        let raw = self.source.read_file(path).map_err(read_error)?;

        let kind = classify(path);
        let target = self.resolve_target_path(path)?;
        let content = match kind {
            FileKind::Plain => raw,
            FileKind::Template | FileKind::Variables => {
                let template = String::from_utf8(raw).map_err(|e| {
                    read_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                })?;
                self.engine
                    .render(path, &template, self.context)
                    .map_err(|e| Error::RenderError { path: path.to_string(), source: Box::new(e) })?
                    .into_bytes()
            }
        };

        match kind {
            FileKind::Plain => debug!("Copying file: {}", target),
            FileKind::Template => debug!("Writing file: {} (from {})", target, path),
            FileKind::Variables => debug!("Writing variables file: {} (from {})", target, path),
        }

        if let Some(dir) = parent(&target) {
            self.dest
                .create_dir_all(dir)
                .map_err(|source| Error::DirectoryCreateError { path: dir.to_string(), source })?;
        }
        self.dest
            .write_file(&target, &content)
            .map_err(|source| Error::WriteError { path: target.clone(), source })?;

        if kind == FileKind::Plain {
            return Ok(Outcome::Copied { target });
        }

        if target != path {
            self.remove_marked(path)?;
        }
        Ok(Outcome::Rendered { target, kind })
    }

    /// Removes a marked entry from the destination. A missing entry is fine:
    /// it only exists when rendering in place or over a previous output.
    fn remove_marked(&self, path: &str) -> Result<()> {
        match self.dest.remove(path) {
            Ok(()) => {
                debug!("Removed template: {}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::RemoveError { path: path.to_string(), source }),
        }
    }
}
