use super::*;

// =============================================================================
// MemoryStorage
// =============================================================================

#[test]
fn memory_set_get_remove() {
    let storage = MemoryStorage::new();
    assert!(storage.is_empty());

    storage.set("token", "abc").unwrap();
    assert_eq!(storage.get("token").as_deref(), Some("abc"));
    assert_eq!(storage.len(), 1);

    storage.remove("token").unwrap();
    assert_eq!(storage.get("token"), None);
    assert!(storage.is_empty());
}

#[test]
fn memory_remove_absent_key_is_ok() {
    let storage = MemoryStorage::new();
    assert!(storage.remove("missing").is_ok());
}

// =============================================================================
// FileStorage
// =============================================================================

#[test]
fn file_storage_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let storage = FileStorage::open(&path);
    storage.set("token", "t-1").unwrap();
    storage.set("role", "USER").unwrap();
    storage.remove("role").unwrap();

    let reopened = FileStorage::open(&path);
    assert_eq!(reopened.get("token").as_deref(), Some("t-1"));
    assert_eq!(reopened.get("role"), None);
    assert_eq!(reopened.path(), path.as_path());
}

#[test]
fn file_storage_missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path().join("absent.json"));
    assert_eq!(storage.get("token"), None);
}

#[test]
fn file_storage_corrupt_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{not json").unwrap();

    let storage = FileStorage::open(&path);
    assert_eq!(storage.get("token"), None);

    storage.set("token", "fresh").unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: HashMap<String, String> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.get("token").map(String::as_str), Some("fresh"));
}
