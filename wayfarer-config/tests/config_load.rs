use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use wayfarer_common::observability::LogFormat;
use wayfarer_config::WayfarerConfigLoader;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

const FILE_YAML: &str = r#"
version: "0.1"
map:
  api_key: "${WAYFARER_TEST_MAPS_KEY}"
speech:
  language: "en-GB"
  rate: 1.0
logging:
  format: json
  stderr: true
"#;

#[test]
#[serial]
fn file_values_and_env_references_are_merged() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "wayfarer.yaml", FILE_YAML);

    let config = temp_env::with_var("WAYFARER_TEST_MAPS_KEY", Some("maps-secret"), || {
        WayfarerConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config")
    });

    assert_eq!(config.version.as_deref(), Some("0.1"));
    assert_eq!(config.map.api_key(), Some("maps-secret"));
    assert_eq!(config.speech.rate, Some(1.0));
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.logging.stderr);
    assert_eq!(config.logging.filter, "info");
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "wayfarer.yaml", FILE_YAML);

    let config = temp_env::with_vars(
        [
            ("WAYFARER__SPEECH__LANGUAGE", Some("fr-FR")),
            ("WAYFARER__SPEECH__ENABLED", Some("false")),
        ],
        || {
            WayfarerConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config")
        },
    );

    assert_eq!(config.speech.language, "fr-FR");
    assert!(!config.speech.enabled);
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = WayfarerConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults load");

    assert!(config.version.is_none());
    assert!(config.speech.enabled);
    assert_eq!(config.speech.words_per_minute, 170);
    assert_eq!(config.logging.format, LogFormat::Text);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = WayfarerConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(result.is_err());
}
