use std::fs;

use forumsync_core::RenderedDocument;
use forumsync_engine::{ensure_output_dir, ContentWriter, PersistError};
use tempfile::TempDir;

fn document(body: &str) -> RenderedDocument {
    RenderedDocument {
        thread_id: 1,
        filename: "2024-03-05-hello-world.md".to_string(),
        body: body.to_string(),
    }
}

#[test]
fn creates_missing_content_dir() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("content").join("posts");
    assert!(!nested.exists());
    ensure_output_dir(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn rewriting_a_document_replaces_it() {
    let temp = TempDir::new().unwrap();
    let writer = ContentWriter::new(temp.path().join("posts")).unwrap();

    let first = writer.write_document(&document("old")).unwrap();
    assert_eq!(first.file_name().unwrap(), "2024-03-05-hello-world.md");
    assert_eq!(fs::read_to_string(&first).unwrap(), "old");

    let second = writer.write_document(&document("new")).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "new");
    assert_eq!(fs::read_dir(writer.dir()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let err = ContentWriter::new(file_path.clone()).unwrap_err();
    assert!(matches!(err, PersistError::OutputDir { .. }));
    assert!(!file_path
        .with_file_name("2024-03-05-hello-world.md")
        .exists());
}

#[test]
fn content_dir_is_checked_once_per_writer() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("posts");
    let writer = ContentWriter::new(dir.clone()).unwrap();
    assert!(dir.is_dir());

    writer.write_document(&document("first")).unwrap();
    fs::remove_dir_all(&dir).unwrap();

    let err = writer.write_document(&document("second")).unwrap_err();
    assert!(matches!(err, PersistError::Io { .. }));
    assert!(!dir.exists());
}
