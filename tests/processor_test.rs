use templatedir::processor::{
    classify, is_rendered_path_valid, is_template_path, is_vars_path, strip_marker, FileKind,
};

#[test]
fn test_is_template_path() {
    assert!(is_template_path("file.txt.template"));
    assert!(is_template_path("dir/file.template"));
    assert!(is_template_path("{{ Count }}.template"));
    assert!(!is_template_path(".template"));
    assert!(!is_template_path("dir/.template"));
    assert!(!is_template_path("file.templates"));
    assert!(!is_template_path("dir.template/file.txt"));
}

#[test]
fn test_classify() {
    assert_eq!(classify("README.md"), FileKind::Plain);
    assert_eq!(classify("dir1/file.template"), FileKind::Template);
    assert_eq!(classify("dir1/vars/test.template"), FileKind::Variables);
    assert_eq!(classify("vars/test.template"), FileKind::Variables);
    assert_eq!(classify("dir1/vars.template"), FileKind::Template);
    assert_eq!(classify("vars/plain.txt"), FileKind::Plain);
}

#[test]
fn test_strip_marker() {
    assert_eq!(strip_marker("dir/file.txt.template"), "dir/file.txt");
    assert_eq!(strip_marker("dir/file.txt"), "dir/file.txt");
}

#[test]
fn test_is_rendered_path_valid() {
    assert!(!is_rendered_path_valid(""));
    assert!(!is_rendered_path_valid("output//filename.txt"));
    assert!(!is_rendered_path_valid("/filename.txt"));
    assert!(!is_rendered_path_valid("output/"));
    assert!(!is_rendered_path_valid("../filename.txt"));
    assert!(is_rendered_path_valid("filename.txt"));
    assert!(is_rendered_path_valid("output/filename.txt"));
}

#[test]
fn test_is_vars_path() {
    assert!(is_vars_path("vars/test.template"));
    assert!(is_vars_path("dir1/vars/test.template"));
    assert!(!is_vars_path("dir1/vars"));
    assert!(!is_vars_path("dir1/variables/test.template"));
}
