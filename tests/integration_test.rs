//! Integration tests for tagger
//!
//! These tests create temporary tagged trees and drive the public storage API
//! end to end, checking both indexes and the files they leave on disk.

use std::fs;
use std::path::{Path, PathBuf};
use tagger::db::{Database, DbError, FileKey, MalformedLinePolicy, META_DIR_NAME, TagName, shard};
use tempfile::TempDir;

/// Helper function to create an initialized tree inside a fresh temp dir
fn setup_tree() -> (TempDir, PathBuf, Database) {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("proj");
    let db = Database::initialize(&base).unwrap();
    (dir, base, db)
}

fn tag_names(tags: Vec<TagName>) -> Vec<String> {
    tags.into_iter().map(TagName::into_string).collect()
}

fn file_keys(keys: Vec<FileKey>) -> Vec<String> {
    keys.into_iter().map(FileKey::into_string).collect()
}

fn read_bucket(base: &Path, key: &str) -> String {
    let path = base
        .join(META_DIR_NAME)
        .join("files")
        .join(shard::file_shard(key));
    fs::read_to_string(path).unwrap_or_default()
}

#[test]
fn test_end_to_end_scenario() {
    let (_dir, base, db) = setup_tree();
    let file = base.join("a.txt");

    db.file_add_tags(&file, &["draft", "v1"]).unwrap();
    assert_eq!(tag_names(db.file_get_tags(&file).unwrap()), vec!["draft", "v1"]);
    assert_eq!(file_keys(db.tag_get_files("draft").unwrap()), vec!["/a.txt"]);
    assert_eq!(file_keys(db.tag_get_files("v1").unwrap()), vec!["/a.txt"]);

    db.tag_remove_files("draft", &[&file]).unwrap();
    assert_eq!(tag_names(db.file_get_tags(&file).unwrap()), vec!["v1"]);
    assert!(db.tag_get_files("draft").unwrap().is_empty());
}

#[test]
fn test_on_disk_layout() {
    let (_dir, base, db) = setup_tree();
    db.file_add_tags(base.join("docs").join("a.txt"), &["v1", "draft"])
        .unwrap();

    assert_eq!(read_bucket(&base, "/docs/a.txt"), "/docs/a.txt\0draft,v1\n");

    let tag_file = base
        .join(META_DIR_NAME)
        .join("tags")
        .join(shard::tag_shard("draft"))
        .join("draft");
    assert_eq!(fs::read_to_string(tag_file).unwrap(), "/docs/a.txt\n");
}

#[test]
fn test_reads_tree_written_by_hand() {
    let (_dir, base, db) = setup_tree();
    let bucket = base
        .join(META_DIR_NAME)
        .join("files")
        .join(shard::file_shard("/legacy.txt"));
    fs::write(&bucket, "/legacy.txt\0old, older\n").unwrap();

    assert_eq!(
        tag_names(db.file_get_tags(base.join("legacy.txt")).unwrap()),
        vec!["old", "older"]
    );
}

#[test]
fn test_open_from_nested_directory() {
    let (_dir, base, db) = setup_tree();
    let nested = base.join("deep").join("er");
    fs::create_dir_all(&nested).unwrap();
    db.file_add_tags(nested.join("x.txt"), &["found"]).unwrap();

    let reopened = Database::open(&nested).unwrap();
    assert_eq!(reopened.root().base(), base.as_path());
    assert_eq!(
        file_keys(reopened.tag_get_files("found").unwrap()),
        vec!["/deep/er/x.txt"]
    );
}

#[test]
fn test_open_outside_any_tree_fails() {
    let dir = TempDir::new().unwrap();
    let result = Database::open(dir.path());
    assert!(matches!(result, Err(DbError::NotInTrackedTree(_))));
}

#[test]
fn test_out_of_tree_rejection_mutates_nothing() {
    let (dir, base, db) = setup_tree();
    let outside = dir.path().join("proj-other").join("a.txt");

    assert!(matches!(
        db.file_add_tags(&outside, &["draft"]),
        Err(DbError::NotInTrackedTree(_))
    ));
    assert!(matches!(
        db.file_remove_tags(&outside, &["draft"]),
        Err(DbError::NotInTrackedTree(_))
    ));
    assert!(matches!(
        db.tag_add_files("draft", &[&outside]),
        Err(DbError::NotInTrackedTree(_))
    ));

    assert!(db.list_files().unwrap().is_empty());
    assert!(db.list_tags().unwrap().is_empty());
    assert_eq!(
        fs::read_dir(base.join(META_DIR_NAME).join("tags")).unwrap().count(),
        0
    );
}

#[test]
fn test_validation_short_circuit() {
    let (_dir, base, db) = setup_tree();
    let file = base.join("a.txt");
    db.file_add_tags(&file, &["kept"]).unwrap();

    let result = db.file_add_tags(&file, &["good", "bad/tag"]);
    assert!(matches!(result, Err(DbError::InvalidTag(_))));
    assert_eq!(tag_names(db.file_get_tags(&file).unwrap()), vec!["kept"]);

    let result = db.tag_add_files("bad,tag", &[&file]);
    assert!(matches!(result, Err(DbError::InvalidTag(_))));
    assert_eq!(tag_names(db.file_get_tags(&file).unwrap()), vec!["kept"]);
}

#[test]
fn test_many_files_many_tags_stay_symmetric() {
    let (_dir, base, db) = setup_tree();
    let files: Vec<PathBuf> = (0..40).map(|i| base.join(format!("f{i}.txt"))).collect();

    for (i, file) in files.iter().enumerate() {
        let tag = format!("mod{}", i % 3);
        db.file_add_tags(file, &[tag.as_str(), "all"]).unwrap();
    }
    db.tag_remove_files("all", &files[..10]).unwrap();
    db.file_remove_tags(&files[39], &["mod0"]).unwrap();

    assert!(db.check().unwrap().is_empty());
    assert_eq!(db.tag_get_files("all").unwrap().len(), 30);
    assert_eq!(db.list_files().unwrap().len(), 40);

    let counts: Vec<(String, usize)> = db
        .list_tags()
        .unwrap()
        .into_iter()
        .map(|(tag, count)| (tag.into_string(), count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("all".to_string(), 30),
            ("mod0".to_string(), 13),
            ("mod1".to_string(), 13),
            ("mod2".to_string(), 13),
        ]
    );
}

#[test]
fn test_malformed_policy_drop_matches_legacy_behaviour() {
    let (_dir, base, db) = setup_tree();
    let db = db.with_policy(MalformedLinePolicy::Drop);
    let bucket = base
        .join(META_DIR_NAME)
        .join("files")
        .join(shard::file_shard("/a.txt"));
    fs::write(&bucket, "broken line\n").unwrap();

    db.file_add_tags(base.join("a.txt"), &["x"]).unwrap();
    assert_eq!(fs::read_to_string(&bucket).unwrap(), "/a.txt\0x\n");
}

#[test]
fn test_malformed_policy_preserve_is_default() {
    let (_dir, base, db) = setup_tree();
    let bucket = base
        .join(META_DIR_NAME)
        .join("files")
        .join(shard::file_shard("/a.txt"));
    fs::write(&bucket, "broken line\n").unwrap();

    db.file_add_tags(base.join("a.txt"), &["x"]).unwrap();
    db.file_remove_tags(base.join("a.txt"), &["x"]).unwrap();
    assert_eq!(fs::read_to_string(&bucket).unwrap(), "broken line\n");
}

#[test]
fn test_invalid_tag_in_bucket_keeps_one_record_per_file() {
    let (_dir, base, db) = setup_tree();
    let file = base.join("a.txt");
    let bucket = base
        .join(META_DIR_NAME)
        .join("files")
        .join(shard::file_shard("/a.txt"));
    fs::write(&bucket, "/a.txt\0draft,bad/tag\n").unwrap();

    assert_eq!(tag_names(db.file_get_tags(&file).unwrap()), vec!["draft"]);

    db.file_add_tags(&file, &["v1"]).unwrap();
    assert_eq!(fs::read_to_string(&bucket).unwrap(), "/a.txt\0draft,v1\n");
    assert_eq!(tag_names(db.file_get_tags(&file).unwrap()), vec!["draft", "v1"]);
}

#[test]
fn test_tag_record_lines_are_trimmed() {
    let (_dir, base, db) = setup_tree();
    let record = base
        .join(META_DIR_NAME)
        .join("tags")
        .join(shard::tag_shard("draft"));
    fs::create_dir_all(&record).unwrap();
    fs::write(record.join("draft"), "/a.txt \r\n  /b.txt\r\n").unwrap();

    assert_eq!(
        file_keys(db.tag_get_files("draft").unwrap()),
        vec!["/a.txt", "/b.txt"]
    );
}
