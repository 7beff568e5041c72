use std::io;

use templatedir::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ArgumentsError("invalid arguments".to_string());
    assert_eq!(err.to_string(), "Arguments error: invalid arguments.");

    let err = Error::WriteError {
        path: "dir1/file3.txt".to_string(),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
    };
    assert_eq!(err.to_string(), "Cannot write 'dir1/file3.txt': permission denied.");

    let err = Error::InvalidRenderedPath {
        path: "{{ Name }}.template".to_string(),
        rendered: String::new(),
    };
    assert_eq!(err.to_string(), "Template '{{ Name }}.template' renders to an invalid path ''.");
}

#[test]
fn test_render_error_keeps_source() {
    let engine_err = minijinja::Error::new(minijinja::ErrorKind::SyntaxError, "unexpected end");
    let err = Error::RenderError {
        path: "file.template".to_string(),
        source: Box::new(Error::MinijinjaError(engine_err)),
    };

    assert!(err.to_string().starts_with("Cannot render 'file.template': "));
    assert!(std::error::Error::source(&err).is_some());
}
