//! Integration tests for ingestion and editing.

mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use common::{png_bytes, TestHarness};
use mediavault::catalog::Catalog;
use mediavault::library::Upload;
use mediavault::storage::ObjectStore;
use mediavault::{Error, ObjectId};

#[test]
fn test_ingest_writes_month_bucketed_file() {
    let h = TestHarness::new();
    let data = png_bytes(8, 8);

    let ingested = h
        .vault
        .library
        .ingest(Upload {
            file_name: "photo.png".to_string(),
            data: data.clone(),
            description: "first light".to_string(),
            tags: vec!["dawn".into(), "sky".into(), "dawn".into()],
            ..Default::default()
        })
        .unwrap();

    let object = h.get(ingested.id);
    assert_eq!(object.name, ingested.name);
    assert_eq!(object.mime, "image/png");
    assert_eq!(object.description, "first light");
    assert_eq!(object.tags, vec!["dawn", "sky"]);

    let month = Utc::now().format("%Y-%m").to_string();
    let (bucket, file_name) = object.path.split_once('/').unwrap();
    assert_eq!(bucket, month);
    assert!(file_name.ends_with(&format!("-{}", object.name)), "{file_name}");
    assert_eq!(std::fs::read(h.file_path(&object)).unwrap(), data);
}

#[test]
fn test_ids_increase_with_each_ingestion() {
    let h = TestHarness::new();
    let a = h.put("a.txt", b"a");
    let b = h.put("b.txt", b"b");
    assert!(b.id > a.id);

    // Deleting the newest does not free its id.
    h.vault.library.delete(b.id).unwrap();
    let c = h.put("c.txt", b"c");
    assert!(c.id > b.id);
}

#[test]
fn test_explicit_mime_overrides_extension() {
    let h = TestHarness::new();
    let ingested = h
        .vault
        .library
        .ingest(Upload {
            file_name: "data.bin".to_string(),
            mime: Some("image/x-custom".to_string()),
            data: b"raw".to_vec(),
            name: Some("custom.bin".to_string()),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(h.get(ingested.id).mime, "image/x-custom");
}

#[test]
fn test_unknown_extension_is_octet_stream() {
    let h = TestHarness::new();
    let object = h.put("blob.zzz", b"?");
    assert_eq!(object.mime, "application/octet-stream");
}

#[test]
fn test_explicit_name_collision_keeps_existing_file() {
    let h = TestHarness::new();
    let original = h.put("same.txt", b"original");

    let err = h
        .vault
        .library
        .ingest(Upload {
            file_name: "same.txt".to_string(),
            data: b"intruder".to_vec(),
            name: Some("same.txt".to_string()),
            ..Default::default()
        })
        .unwrap_err();
    assert_matches!(err, Error::AlreadyExists(_));

    assert_eq!(std::fs::read(h.file_path(&original)).unwrap(), b"original");
}

#[test]
fn test_invalid_explicit_names_are_rejected() {
    let h = TestHarness::new();
    for name in ["", "../escape.png", "a/b.png"] {
        let err = h
            .vault
            .library
            .ingest(Upload {
                file_name: "x.png".to_string(),
                data: b"x".to_vec(),
                name: Some(name.to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert_matches!(err, Error::InvalidInput(_), "{name:?}");
    }
}

#[test]
fn test_rename_keeps_locator() {
    let h = TestHarness::new();
    let object = h.put("before.txt", b"body");

    let renamed = h.vault.library.rename(object.id, "after.txt").unwrap();
    assert_eq!(renamed.name, "after.txt");
    assert_eq!(renamed.path, object.path);

    let media = h.vault.delivery.resolve_media("after.txt", None).unwrap();
    assert_eq!(media.bytes.as_ref(), b"body");
}

#[test]
fn test_reused_name_after_rename_gets_its_own_file() {
    let h = TestHarness::new();
    let a = h.put("x.txt", b"original A");
    h.vault.library.rename(a.id, "y.txt").unwrap();

    let b = h.put("x.txt", b"new B");
    assert_ne!(b.path, a.path);

    let media = h.vault.delivery.resolve_media("y.txt", None).unwrap();
    assert_eq!(media.bytes.as_ref(), b"original A");
    let media = h.vault.delivery.resolve_media("x.txt", None).unwrap();
    assert_eq!(media.bytes.as_ref(), b"new B");

    // Deleting the newcomer leaves the renamed object's file alone.
    h.vault.library.delete(b.id).unwrap();
    assert_eq!(std::fs::read(h.file_path(&a)).unwrap(), b"original A");
    let media = h.vault.delivery.resolve_media("y.txt", None).unwrap();
    assert_eq!(media.bytes.as_ref(), b"original A");
}

#[test]
fn test_ingest_rolls_back_row_when_locator_is_taken() {
    let h = TestHarness::new();
    let a = h.put("keep.txt", b"keep");

    // A store that already holds every locator rejects the write.
    struct FullStore;
    impl ObjectStore for FullStore {
        fn read_all(&self, _locator: &str) -> mediavault::Result<Vec<u8>> {
            Ok(Vec::new())
        }
        fn write(&self, locator: &str, _data: &[u8]) -> mediavault::Result<()> {
            Err(Error::already_exists(locator))
        }
        fn remove(&self, _locator: &str) -> mediavault::Result<()> {
            Ok(())
        }
        fn local_path(&self, locator: &str) -> mediavault::Result<std::path::PathBuf> {
            Ok(std::path::PathBuf::from(locator))
        }
    }

    let vault = mediavault::vault::Vault::assemble(
        h.vault.catalog.as_ref().clone(),
        std::sync::Arc::new(FullStore),
        h.transformer.clone(),
        &mediavault::config::Config::default(),
    );
    let err = vault
        .library
        .ingest(Upload {
            file_name: "late.txt".to_string(),
            data: b"late".to_vec(),
            name: Some("late.txt".to_string()),
            ..Default::default()
        })
        .unwrap_err();
    assert_matches!(err, Error::AlreadyExists(_));

    assert!(!h.vault.catalog.exists_by_name("late.txt").unwrap());
    assert_eq!(std::fs::read(h.file_path(&a)).unwrap(), b"keep");
}

#[test]
fn test_rename_to_taken_name_fails() {
    let h = TestHarness::new();
    let a = h.put("a.txt", b"a");
    h.put("b.txt", b"b");

    assert_matches!(
        h.vault.library.rename(a.id, "b.txt"),
        Err(Error::AlreadyExists(_))
    );
    assert_eq!(h.get(a.id).name, "a.txt");
}

#[test]
fn test_update_details_replaces_tags() {
    let h = TestHarness::new();
    let object = h.put("doc.pdf", b"%PDF");
    h.vault
        .library
        .update_details(object.id, "doc.pdf", "v1", &["a".into(), "b".into()])
        .unwrap();

    let updated = h
        .vault
        .library
        .update_details(object.id, "report.pdf", "v2", &["c".into()])
        .unwrap();
    assert_eq!(updated.name, "report.pdf");
    assert_eq!(updated.description, "v2");
    assert_eq!(updated.tags, vec!["c"]);
}

#[test]
fn test_delete_removes_row_and_file() {
    let h = TestHarness::new();
    let object = h.put("bye.txt", b"bye");
    let path = h.file_path(&object);
    assert!(path.exists());

    let deleted = h.vault.library.delete(object.id).unwrap();
    assert_eq!(deleted.id, object.id);
    assert!(!path.exists());
    assert!(h.vault.library.detail(object.id).unwrap().is_none());
}

#[test]
fn test_delete_tolerates_missing_file() {
    let h = TestHarness::new();
    let object = h.put("ghost.txt", b"boo");
    h.store.remove(&object.path).unwrap();

    h.vault.library.delete(object.id).unwrap();
    assert!(h.vault.library.detail(object.id).unwrap().is_none());
}

#[test]
fn test_operations_on_missing_ids_are_not_found() {
    let h = TestHarness::new();
    let missing = ObjectId::new(999);

    assert!(h.vault.library.detail(missing).unwrap().is_none());
    assert_matches!(h.vault.library.delete(missing), Err(Error::NotFound(_)));
    assert_matches!(
        h.vault.library.rename(missing, "x.txt"),
        Err(Error::NotFound(_))
    );
}
