use std::fs;

use fintrack_core::{FinanceStore, SnapshotStorage};
use fintrack_domain::{FinanceSnapshot, NewTransaction};
use fintrack_storage_json::{
    load_snapshot_from_path, save_snapshot_to_path, JsonSnapshotStorage, StoragePaths,
};
use serde_json::Value;
use tempfile::tempdir;

#[test]
fn json_storage_can_save_and_load_snapshot() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonSnapshotStorage::new(StoragePaths::in_dir(dir.path(), "finances.json")).expect("create storage");

    assert!(storage.load().expect("load empty").is_none());

    let snapshot = FinanceSnapshot::seeded();
    storage.save(&snapshot).expect("save snapshot");

    let path = storage.data_path();
    assert!(path.exists());
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(!path.with_extension("json.tmp").exists(), "temp file is renamed away");

    let raw = storage.load().expect("load").expect("persisted value");
    for key in ["user", "transactions", "budgets", "goals", "categories"] {
        assert!(raw.get(key).is_some(), "missing `{key}`");
    }
    let (loaded, warnings) = FinanceSnapshot::from_value_lenient(raw);
    assert!(warnings.is_empty());
    assert_eq!(loaded, snapshot);
}

#[test]
fn corrupt_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonSnapshotStorage::new(StoragePaths::in_dir(dir.path(), "finances.json")).expect("create storage");
    fs::write(storage.data_path(), "{ not json").expect("write garbage");

    let err = storage.load().expect_err("corrupt data");
    assert!(matches!(err, fintrack_core::CoreError::Serde(_)));
}

#[test]
fn clear_removes_the_data_file() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonSnapshotStorage::new(StoragePaths::in_dir(dir.path(), "finances.json")).expect("create storage");
    storage.clear().expect("clear empty storage");

    storage.save(&FinanceSnapshot::empty()).expect("save");
    storage.clear().expect("clear");
    assert!(!storage.data_path().exists());
    assert!(storage.load().expect("load").is_none());
}

#[test]
fn json_storage_creates_and_restores_backups() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonSnapshotStorage::new(StoragePaths::in_dir(dir.path(), "finances.json")).expect("create storage");
    storage.save(&FinanceSnapshot::seeded()).expect("save seeded");

    let info = storage.backup(Some("Before cleanup")).expect("create backup");
    assert_eq!(info.note.as_deref(), Some("before-cleanup"));
    assert!(info.created_at.is_some());
    assert!(info.id.starts_with("finances_"));

    storage.save(&FinanceSnapshot::empty()).expect("overwrite");
    let restored = storage.restore_backup(&info.id).expect("restore backup");
    assert_eq!(restored.id, info.id);

    let raw = storage.load().expect("load").expect("value");
    let (loaded, _) = FinanceSnapshot::from_value_lenient(raw);
    assert_eq!(loaded, FinanceSnapshot::seeded());
}

#[test]
fn backups_are_listed_newest_first_and_pruned() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSnapshotStorage::with_retention(
        StoragePaths::in_dir(dir.path(), "finances.json"),
        3,
    )
    .expect("create storage");
    storage.save(&FinanceSnapshot::empty()).expect("save");

    let mut created = Vec::new();
    for idx in 0..5 {
        let note = format!("b{idx}");
        created.push(storage.backup(Some(note.as_str())).expect("backup").id);
    }

    let listed: Vec<String> = storage
        .list_backups()
        .expect("list backups")
        .into_iter()
        .map(|info| info.id)
        .collect();
    assert_eq!(listed.len(), 3);
    let expected: Vec<String> = created.iter().rev().take(3).cloned().collect();
    assert_eq!(listed, expected);
}

#[test]
fn backup_without_data_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonSnapshotStorage::new(StoragePaths::in_dir(dir.path(), "finances.json")).expect("create storage");
    assert!(storage.backup(None).is_err());
    assert!(storage.restore_backup("finances_missing.json").is_err());
}

#[test]
fn store_persists_through_json_storage() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::in_dir(dir.path(), "finances.json");
    let storage = JsonSnapshotStorage::new(paths.clone()).expect("create storage");

    let mut store = FinanceStore::open(Box::new(storage.clone()));
    let txn = store.add_transaction(NewTransaction::income("Bono", 300_000.0, "Salario"));

    let raw: Value =
        serde_json::from_str(&fs::read_to_string(&paths.data_file).expect("read file")).expect("json");
    assert_eq!(raw["transactions"].as_array().map(Vec::len), Some(6));

    let reopened = FinanceStore::open(Box::new(storage));
    assert_eq!(reopened.transaction(txn.id), Some(txn));

    let (snapshot, warnings) = load_snapshot_from_path(&paths.data_file).expect("load from path");
    assert!(warnings.is_empty());
    assert_eq!(snapshot.transactions.len(), 6);
}

#[test]
fn snapshot_backups_do_not_need_a_data_file() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonSnapshotStorage::new(StoragePaths::in_dir(dir.path(), "finances.json")).expect("create storage");
    assert!(!storage.data_path().exists());

    let info = storage
        .backup_snapshot(&FinanceSnapshot::seeded(), Some("export"))
        .expect("snapshot backup");
    assert_eq!(info.note.as_deref(), Some("export"));
    assert!(!storage.data_path().exists(), "data file is left alone");

    storage.restore_backup(&info.id).expect("restore");
    let (loaded, _) = load_snapshot_from_path(storage.data_path()).expect("load");
    assert_eq!(loaded, FinanceSnapshot::seeded());
}

#[test]
fn delete_backup_removes_only_listed_backups() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonSnapshotStorage::new(StoragePaths::in_dir(dir.path(), "finances.json")).expect("create storage");
    storage.save(&FinanceSnapshot::empty()).expect("save");
    let kept = storage.backup(Some("keep")).expect("backup");
    let dropped = storage.backup(Some("drop")).expect("backup");

    let removed = storage.delete_backup(&dropped.id).expect("delete");
    assert_eq!(removed.id, dropped.id);
    assert!(!dropped.path.exists());
    let listed: Vec<String> = storage
        .list_backups()
        .expect("list")
        .into_iter()
        .map(|info| info.id)
        .collect();
    assert_eq!(listed, vec![kept.id]);

    assert!(storage.delete_backup(&dropped.id).is_err());
    assert!(storage.delete_backup("../finances.json").is_err());
    assert!(storage.data_path().exists(), "live data file survives traversal attempts");
}

#[test]
fn snapshots_round_trip_through_arbitrary_paths() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("exports").join("copy.json");

    save_snapshot_to_path(&FinanceSnapshot::seeded(), &path).expect("save to path");

    assert!(!path.with_extension("json.tmp").exists());
    let (snapshot, warnings) = load_snapshot_from_path(&path).expect("load from path");
    assert!(warnings.is_empty());
    assert_eq!(snapshot, FinanceSnapshot::seeded());
}

#[test]
fn prune_failures_do_not_fail_the_backup() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSnapshotStorage::with_retention(
        StoragePaths::in_dir(dir.path(), "finances.json"),
        1,
    )
    .expect("create storage");
    storage.save(&FinanceSnapshot::empty()).expect("save");
    let stuck = storage.backup_root().join("finances_20000101000000000_000.json");
    fs::create_dir(&stuck).expect("create stuck entry");

    let info = storage.backup(None).expect("backup despite prune failure");

    assert!(info.path.exists());
    assert!(stuck.is_dir(), "unremovable entry is left in place");
    let listed = storage.list_backups().expect("list");
    assert_eq!(listed.first().map(|b| b.id.as_str()), Some(info.id.as_str()));
}
