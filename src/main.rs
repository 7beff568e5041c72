//! templatedir's application entry point.
//! Parses the command line, builds the argument mapping and renders the
//! target directory.

use std::path::{Path, PathBuf};

use templatedir::{
    args::{default_args, load_args_file, load_from_stdin, merge_args, Ambient},
    cli::{get_args, Args},
    error::{default_error_handler, Error, Result},
    fs::{DiskFs, WriteFs},
    logger::init_logger,
    render::{render_to_with, RenderOptions},
    renderer::MiniJinjaRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Resolves the directory to render to an absolute path.
///
/// # Errors
/// * `Error::TemplateDirNotFound` if the directory does not exist
fn resolve_target_dir(target_dir: Option<PathBuf>, cwd: &Path) -> Result<PathBuf> {
    let target_dir = target_dir.unwrap_or_else(|| cwd.to_path_buf());
    std::fs::canonicalize(&target_dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::TemplateDirNotFound(target_dir.display().to_string()),
        _ => Error::IoError(e),
    })
}

/// Main application logic execution.
///
/// # Flow
/// 1. Resolves the target directory
/// 2. Builds the default arguments from the environment and target directory
/// 3. Merges the argument file and stdin document over them
/// 4. Renders the target directory in place, or into `--output`
fn run(args: Args) -> Result<()> {
    println!("templatedir");

    let ambient = Ambient::from_process()?;
    let target_dir = resolve_target_dir(args.target_dir, &ambient.cwd)?;
    println!("->\tapplying to directory {}", target_dir.display());

    let ambient = Ambient { cwd: target_dir.clone(), ..ambient };
    let mut context = default_args(&ambient)?;
    if let Some(path) = &args.args_file {
        context = merge_args(context, load_args_file(path)?);
    }
    if args.stdin {
        context = merge_args(context, load_from_stdin()?);
    }

    let options = match args.jobs {
        Some(jobs) => RenderOptions { jobs },
        None => RenderOptions::default(),
    };
    let engine = MiniJinjaRenderer::new();
    let source = DiskFs::new(&target_dir);

    let (summary, output_dir) = match args.output {
        Some(output_dir) => {
            let dest = DiskFs::new(&output_dir);
            dest.create_dir_all("")?;
            (render_to_with(&source, &dest, &engine, &context, &options)?, output_dir)
        }
        None => (render_to_with(&source, &source, &engine, &context, &options)?, target_dir),
    };

    println!(
        "Rendered {} template(s) and {} variables file(s), copied {} file(s) into {}.",
        summary.rendered,
        summary.variables,
        summary.copied,
        output_dir.display()
    );
    Ok(())
}
