use multicloud::cli::config::ConfigStore;
use serde_yaml::Value;
use tempfile::TempDir;

fn temp_store() -> (TempDir, ConfigStore) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = ConfigStore::at(dir.path());
    (dir, store)
}

#[test]
fn test_first_load_writes_default_config() {
    let (_dir, mut store) = temp_store();

    let config = store.load().unwrap();

    // Defaults are seeded and persisted on first use
    assert!(store.config_file().exists());
    assert!(config.get("author").is_some());
    assert_eq!(
        store.get("defaults.memory").unwrap(),
        Some(Value::String("128Mi".to_string()))
    );
    assert_eq!(
        store.get("author.name").unwrap(),
        Some(Value::String(String::new()))
    );
}

#[test]
fn test_set_then_get_round_trip() {
    let (_dir, mut store) = temp_store();

    store.set("author.name", "Jane Doe").unwrap();

    assert_eq!(
        store.get("author.name").unwrap(),
        Some(Value::String("Jane Doe".to_string()))
    );
}

#[test]
fn test_set_persists_across_store_instances() {
    let (dir, mut store) = temp_store();

    store.set("defaults.runtime", "rust").unwrap();

    // A fresh store over the same directory reads the saved value
    let mut reopened = ConfigStore::at(dir.path());
    assert_eq!(
        reopened.get("defaults.runtime").unwrap(),
        Some(Value::String("rust".to_string()))
    );
}

#[test]
fn test_set_creates_nested_paths() {
    let (_dir, mut store) = temp_store();

    store.set("platforms.knative.namespace", "staging").unwrap();

    assert_eq!(
        store.get("platforms.knative.namespace").unwrap(),
        Some(Value::String("staging".to_string()))
    );
}

#[test]
fn test_get_unknown_key_returns_none() {
    let (_dir, mut store) = temp_store();

    assert_eq!(store.get("does.not.exist").unwrap(), None);

    // Traversing through a scalar is also a miss, not an error
    store.set("author.name", "Jane").unwrap();
    assert_eq!(store.get("author.name.deeper").unwrap(), None);
}

#[test]
fn test_reset_removes_file_and_reseeds_on_next_load() {
    let (_dir, mut store) = temp_store();

    store.set("author.name", "Jane Doe").unwrap();
    store.reset().unwrap();
    assert!(!store.config_file().exists());

    // Next load starts from the defaults again
    assert_eq!(
        store.get("author.name").unwrap(),
        Some(Value::String(String::new()))
    );
}

#[test]
fn test_unreadable_config_falls_back_to_defaults() {
    let (_dir, mut store) = temp_store();

    std::fs::create_dir_all(store.config_dir()).unwrap();
    std::fs::write(store.config_file(), "{ invalid: [unclosed").unwrap();

    // Load succeeds with the defaults instead of failing
    let config = store.load().unwrap();
    assert!(config.get("defaults").is_some());
}

#[test]
fn test_empty_config_file_is_empty_mapping() {
    let (_dir, mut store) = temp_store();

    std::fs::create_dir_all(store.config_dir()).unwrap();
    std::fs::write(store.config_file(), "").unwrap();

    assert_eq!(store.get("author.name").unwrap(), None);
}
