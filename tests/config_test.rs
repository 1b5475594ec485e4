use std::fs;

use mendeley_lookup::config::*;
use mendeley_lookup::discovery::MendeleyPaths;
use mendeley_lookup::errors::LookupError;
use tempfile::TempDir;

#[test]
fn test_load_missing_config_is_default() {
    let dir = TempDir::new().unwrap();
    let config = load_config(&dir.path().join(CONFIG_FILENAME)).unwrap();
    assert_eq!(config, LookupConfig::default());
    assert_eq!(config.configured_database_path(), None);
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join(APP_DIR).join(CONFIG_FILENAME);
    let config = LookupConfig {
        database_path: Some("/data/jane@example.org@www.mendeley.com.sqlite".to_string()),
    };

    save_config(&config_path, &config).unwrap();
    let loaded = load_config(&config_path).unwrap();

    assert_eq!(config, loaded);
    assert!(!config_path.with_extension("tmp").exists());
}

#[test]
fn test_saved_config_uses_mendeley_section() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join(CONFIG_FILENAME);
    let mut config = LookupConfig::default();
    config.set_database_path("/tmp/library.sqlite");

    save_config(&config_path, &config).unwrap();

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("[mendeley]"), "got: {contents}");
    assert!(contents.contains("/tmp/library.sqlite"));
}

#[test]
fn test_unparsable_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join(CONFIG_FILENAME);
    fs::write(&config_path, "[mendeley\ndatabase_path = ").unwrap();

    let result = load_config(&config_path);
    assert!(matches!(result, Err(LookupError::Config { .. })));
}

#[test]
fn test_set_database_path_ignores_blank() {
    let mut config = LookupConfig::default();
    config.set_database_path("/a.sqlite");
    config.set_database_path("   ");
    assert_eq!(config.database_path.as_deref(), Some("/a.sqlite"));
}

#[test]
fn test_blank_configured_path_counts_as_unset() {
    let config = LookupConfig {
        database_path: Some("  ".to_string()),
    };
    assert_eq!(config.configured_database_path(), None);
}

#[test]
fn test_effective_path_prefers_configured() {
    let home = TempDir::new().unwrap();
    let paths = MendeleyPaths::under_home(home.path());
    let config = LookupConfig {
        database_path: Some("/chosen.sqlite".to_string()),
    };
    assert_eq!(
        config.effective_database_path(Some(&paths)),
        Some("/chosen.sqlite".into())
    );
}

#[test]
fn test_effective_path_falls_back_to_discovery() {
    let home = TempDir::new().unwrap();
    let paths = MendeleyPaths::under_home(home.path());
    fs::create_dir_all(paths.config_file.parent().unwrap()).unwrap();
    fs::write(&paths.config_file, "[MendeleyWeb]\nuserEmail=jane@example.org\n").unwrap();
    fs::create_dir_all(&paths.data_dir).unwrap();
    let db_path = paths
        .data_dir
        .join("jane@example.org@www.mendeley.com.sqlite");
    fs::write(&db_path, b"").unwrap();

    let config = LookupConfig::default();
    assert_eq!(config.effective_database_path(Some(&paths)), Some(db_path));
    assert_eq!(config.effective_database_path(None), None);
}
