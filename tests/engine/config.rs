//! Configuration file lifecycle

use crate::common::*;
use schemata::CONFIG_FILE_NAME;
use tempfile::TempDir;

#[test]
fn open_writes_default_config() {
    let dir = TempDir::new().unwrap();
    let engine = SchemaEngine::open(dir.path()).unwrap();
    assert_eq!(engine.config(), &EngineConfig::default());
    assert!(engine.cache().is_enabled());

    let written = std::fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(written, EngineConfig::default_toml());
}

#[test]
fn existing_config_is_respected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "cache_enabled = false\n").unwrap();

    let engine = SchemaEngine::open(dir.path()).unwrap();
    assert!(!engine.config().cache_enabled);
    assert!(engine.config().extract_document_text);
    assert!(!engine.cache().is_enabled());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "cache_enabled = false\n");
}

#[test]
fn written_config_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    let config = EngineConfig {
        cache_enabled: false,
        extract_document_text: false,
    };
    config.write_to_file(&path).unwrap();
    assert_eq!(EngineConfig::from_file(&path).unwrap(), config);
}

#[test]
fn invalid_config_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    std::fs::write(&path, "cache_enabled = \"sometimes\"\n").unwrap();
    assert_code(EngineConfig::from_file(&path), "config");

    std::fs::write(&path, "cache_size = 10\n").unwrap();
    assert_code(SchemaEngine::open(dir.path()), "config");

    assert_code(EngineConfig::from_file(&dir.path().join("absent.toml")), "config");
}
