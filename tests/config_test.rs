// Tests for config loading

use std::fs;

use localassist::api::DEFAULT_BASE_URL;
use localassist::config::Config;
use tempfile::TempDir;

#[test]
fn test_defaults_point_at_local_backend() {
    let config = Config::default();
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.page_size, 10);
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yml");
    fs::write(&path, "base_url: http://assistant.lan:9000\n").unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.base_url, "http://assistant.lan:9000");
    assert_eq!(config.page_size, 10);
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yml");
    fs::write(&path, "page_size: [not, a, number]\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_base_url_override() {
    let config = Config::default().with_base_url(Some("http://10.0.0.2:8000".into()));
    assert_eq!(config.base_url, "http://10.0.0.2:8000");

    let unchanged = Config::default().with_base_url(Some("  ".into()));
    assert_eq!(unchanged.base_url, DEFAULT_BASE_URL);
}

#[test]
fn test_missing_file_yields_defaults_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.yml");

    let config = Config::load(Some(path.to_str().unwrap())).unwrap();

    assert_eq!(config, Config::default());
    assert!(!path.exists());
}
