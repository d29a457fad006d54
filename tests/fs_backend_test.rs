use reckon::history::{HistoryStore, HISTORY_KEY};
use reckon::model::HistoryRecord;
use reckon::store::fs_backend::FsBackend;
use reckon::store::KeyValueStore;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("data"));
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_io() {
    let (_dir, backend) = setup();

    assert_eq!(backend.get("answer").unwrap(), None);

    backend.set("answer", "42").unwrap();
    assert_eq!(backend.get("answer").unwrap(), Some("42".to_string()));

    backend.set("answer", "43").unwrap();
    assert_eq!(backend.get("answer").unwrap(), Some("43".to_string()));

    backend.remove("answer").unwrap();
    assert_eq!(backend.get("answer").unwrap(), None);
}

#[test]
fn test_fs_backend_creates_root_lazily() {
    let (_dir, backend) = setup();
    assert!(!backend.root().exists());

    backend.remove("missing").unwrap();
    assert!(!backend.root().exists());

    backend.set("k", "v").unwrap();
    assert!(backend.root().join("k.json").exists());
}

#[test]
fn test_fs_backend_leaves_no_tmp_files() {
    let (_dir, backend) = setup();
    for i in 0..5 {
        backend.set("k", &i.to_string()).unwrap();
    }

    for entry in fs::read_dir(backend.root()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_failed_set_removes_tmp_file() {
    let (_dir, backend) = setup();
    // A non-empty directory where the entry should go makes the final step fail.
    fs::create_dir_all(backend.root().join("k.json").join("blocker")).unwrap();

    assert!(backend.set("k", "v").is_err());

    for entry in fs::read_dir(backend.root()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_rejects_path_keys() {
    let (_dir, backend) = setup();
    assert!(backend.set("../escape", "x").is_err());
    assert!(backend.get("a/b").is_err());
}

#[test]
fn test_history_survives_reopen() {
    let (dir, backend) = setup();
    let mut history = HistoryStore::new(backend);
    history.record("2^3", 8.0).unwrap();
    history.record("2+3*4", 14.0).unwrap();
    let written = history.records().to_vec();

    let mut reopened = HistoryStore::new(FsBackend::new(dir.path().join("data")));
    assert!(reopened.load().unwrap());
    assert_eq!(reopened.records(), written.as_slice());
}

#[test]
fn test_history_file_layout() {
    let (_dir, backend) = setup();
    let root = backend.root().to_path_buf();
    let mut history = HistoryStore::new(backend);
    history.record("1+1", 2.0).unwrap();

    let raw = fs::read_to_string(root.join(format!("{}.json", HISTORY_KEY))).unwrap();
    assert!(raw.starts_with(r#"[{"expression":"1+1","result":2,"timestamp":""#));

    let parsed: Vec<HistoryRecord> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.len(), 1);
}

#[test]
fn test_history_clear_deletes_file() {
    let (_dir, backend) = setup();
    let path = backend.key_path(HISTORY_KEY).unwrap();
    let mut history = HistoryStore::new(backend);
    history.record("1+1", 2.0).unwrap();
    assert!(path.exists());

    history.clear().unwrap();
    assert!(!path.exists());
}
