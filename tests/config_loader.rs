use std::io::Write;

use chatview::config::{Config, ConfigError, LayoutConfig, TrackerConfig};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write config");
    file
}

#[test]
fn test_config_default_values() {
    let config = Config::default();
    assert_eq!(config.layout.max_rows, 5);
    assert_eq!(config.layout.max_row_width, 5);
    assert!(config.tracker.id_namespace.is_none());
    assert!(config.tracker.acknowledge_after_callback);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_path_ends_with_expected() {
    assert!(Config::config_path().ends_with("chatview/config.toml"));
}

#[test]
fn test_load_full_file() {
    let file = write_config(
        r#"
[layout]
max_rows = 3
max_row_width = 4

[tracker]
id_namespace = "poll"
acknowledge_after_callback = false
"#,
    );

    let config = Config::load_from(file.path()).unwrap();
    assert_eq!(
        config,
        Config {
            layout: LayoutConfig {
                max_rows: 3,
                max_row_width: 4,
            },
            tracker: TrackerConfig {
                id_namespace: Some("poll".to_string()),
                acknowledge_after_callback: false,
            },
        }
    );
}

#[test]
fn test_missing_sections_use_defaults() {
    let file = write_config("[tracker]\nid_namespace = \"x\"\n");
    let config = Config::load_from(file.path()).unwrap();
    assert_eq!(config.layout, LayoutConfig::default());
    assert!(config.tracker.acknowledge_after_callback);
}

#[test]
fn test_validation_rejects_rows_beyond_platform() {
    let file = write_config("[layout]\nmax_rows = 6\n");
    match Config::load_from(file.path()) {
        Err(ConfigError::ValidationError { message }) => assert!(message.contains("max_rows")),
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[test]
fn test_validation_rejects_zero_width() {
    let mut config = Config::default();
    config.layout.max_row_width = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn test_validation_rejects_namespace_with_separator() {
    let mut config = Config::default();
    config.tracker.id_namespace = Some("a:b".to_string());
    assert!(config.validate().is_err());

    config.tracker.id_namespace = Some(String::new());
    assert!(config.validate().is_err());
}

#[test]
fn test_parse_error_reports_path() {
    let file = write_config("[layout\nmax_rows = ");
    match Config::load_from(file.path()) {
        Err(ConfigError::ParseError { path, .. }) => assert_eq!(path, file.path()),
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load_from(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
}
