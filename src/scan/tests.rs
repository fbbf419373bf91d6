use std::{fs, path::Path};

use tempfile::TempDir;

use super::Scanner;

fn write_file(root: &Path, relative: &str, data: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, data).unwrap();
}

fn scanned_keys(scanner: &Scanner) -> Vec<String> {
    let mut keys: Vec<String> = scanner
        .scan()
        .into_iter()
        .map(|record| record.relative_key)
        .collect();
    keys.sort();
    keys
}

#[test]
fn finds_files_recursively() {
    let tree = TempDir::new().unwrap();
    write_file(tree.path(), "a.txt", b"hello");
    write_file(tree.path(), "sub/b.jpg", b"\xff\xd8");

    let scanner = Scanner::new(tree.path().to_owned(), vec![]);
    assert_eq!(scanned_keys(&scanner), ["a.txt", "sub/b.jpg"]);
}

#[test]
fn records_point_at_local_paths() {
    let tree = TempDir::new().unwrap();
    write_file(tree.path(), "sub/b.jpg", b"\xff\xd8");

    let scanner = Scanner::new(tree.path().to_owned(), vec![]);
    let records = scanner.scan();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].local_path, tree.path().join("sub").join("b.jpg"));
    assert_eq!(records[0].relative_key, "sub/b.jpg");
}

#[test]
fn empty_directory_yields_nothing() {
    let tree = TempDir::new().unwrap();
    let scanner = Scanner::new(tree.path().to_owned(), vec![]);
    assert!(scanner.scan().is_empty());
}

#[test]
fn missing_root_yields_nothing() {
    let tree = TempDir::new().unwrap();
    let scanner = Scanner::new(tree.path().join("nope"), vec![]);
    assert!(scanner.scan().is_empty());
}

#[test]
fn directories_are_not_records() {
    let tree = TempDir::new().unwrap();
    fs::create_dir_all(tree.path().join("only/dirs/here")).unwrap();

    let scanner = Scanner::new(tree.path().to_owned(), vec![]);
    assert!(scanner.scan().is_empty());
}

#[test]
fn exclusions_apply_to_file_names() {
    let tree = TempDir::new().unwrap();
    write_file(tree.path(), "photo.jpg", b"\xff\xd8");
    write_file(tree.path(), ".DS_Store", b"\x00");
    write_file(tree.path(), "sub/previews.lrdata", b"cache");
    write_file(tree.path(), "keep.png", b"\x89PNG");

    let exclude = vec![".DS_Store".to_owned(), "*.lrdata".to_owned()];
    let scanner = Scanner::new(tree.path().to_owned(), exclude);
    assert_eq!(scanned_keys(&scanner), ["keep.png", "photo.jpg"]);
}
