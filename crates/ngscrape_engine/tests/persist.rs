use std::fs;

use ngscrape_engine::{ensure_output_dir, AtomicFileWriter, PersistError, Persister};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn persist_creates_nested_directory() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("games").join("flash");

    let path = AtomicFileWriter.persist(&dir, "game.swf", b"FWS").unwrap();
    assert_eq!(path, dir.join("game.swf"));
    assert_eq!(fs::read(&path).unwrap(), b"FWS");
}

#[test]
fn persist_replaces_existing_file() {
    let temp = TempDir::new().unwrap();

    let first = AtomicFileWriter.persist(temp.path(), "card.png", b"old").unwrap();
    let second = AtomicFileWriter.persist(temp.path(), "card.png", b"new").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"new");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn persist_rejects_path_like_filenames() {
    let temp = TempDir::new().unwrap();
    for name in ["", "../escape.swf", "sub/game.swf"] {
        let err = AtomicFileWriter.persist(temp.path(), name, b"x").unwrap_err();
        assert!(matches!(err, PersistError::InvalidFilename(_)), "{name}");
    }
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let result = AtomicFileWriter.persist(&file_path, "game.swf", b"data");
    assert!(matches!(result, Err(PersistError::OutputDir(_))));
    assert!(!file_path.with_file_name("game.swf").exists());
}
