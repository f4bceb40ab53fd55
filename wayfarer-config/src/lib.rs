//! Loader for Wayfarer configuration with YAML + environment overlays.
//!
//! Every section is optional; an empty document yields the defaults below.
//!
//! ```yaml
//! version: "1"
//! map:
//!   api_key: "${MAPS_API_KEY}"
//! speech:
//!   enabled: true
//!   language: "en-GB"
//!   rate: 1.0
//!   words_per_minute: 170
//! logging:
//!   dir: "~/.local/share/wayfarer"
//!   format: text        # or json
//!   stderr: false
//!   filter: "info"
//! ```
//!
//! Environment variables prefixed with `WAYFARER__` override file values, with
//! `__` separating nested keys (`WAYFARER__SPEECH__LANGUAGE=fr-FR`). String
//! values may reference other variables as `${VAR}`; references are expanded
//! after all sources are merged.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use wayfarer_common::observability::LogFormat;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const MAXIMUM_SPEECH_RATE: f32 = 10.0;

#[derive(Debug, Default, Deserialize)]
pub struct WayfarerConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Map provider settings handed to the map presenter.
#[derive(Debug, Default, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub api_key: Option<String>,
}

impl MapConfig {
    /// The provider key, if one was supplied and its `${VAR}` reference resolved.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.contains("${"))
    }
}

/// Defaults for the spoken announcements.
#[derive(Debug, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_enabled")]
    pub enabled: bool,
    #[serde(default = "default_speech_language")]
    pub language: String,
    #[serde(default)]
    pub rate: Option<f32>,
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_speech_enabled(),
            language: default_speech_language(),
            rate: None,
            words_per_minute: default_words_per_minute(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub stderr: bool,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::default(),
            stderr: false,
            filter: default_log_filter(),
        }
    }
}

fn default_speech_enabled() -> bool {
    true
}
fn default_speech_language() -> String {
    "en-GB".into()
}
fn default_words_per_minute() -> u32 {
    170
}
fn default_log_filter() -> String {
    "info".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn validate(cfg: &WayfarerConfig) -> Result<(), ConfigError> {
    if cfg.speech.language.trim().is_empty() {
        return Err(ConfigError::Message(
            "speech.language must not be empty".into(),
        ));
    }
    if let Some(rate) = cfg.speech.rate {
        if !(rate > 0.0 && rate <= MAXIMUM_SPEECH_RATE) {
            return Err(ConfigError::Message(format!(
                "speech.rate must be within (0, {MAXIMUM_SPEECH_RATE}], got {rate}"
            )));
        }
    }
    if cfg.speech.words_per_minute == 0 {
        return Err(ConfigError::Message(
            "speech.words_per_minute must be positive".into(),
        ));
    }
    Ok(())
}

/// Builder hides the `config` crate wiring (files + env overrides).
pub struct WayfarerConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for WayfarerConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl WayfarerConfigLoader {
    /// Start empty; every setting has a default and the environment overlay is
    /// applied on [`load`](Self::load).
    ///
    /// ```
    /// use wayfarer_config::WayfarerConfigLoader;
    ///
    /// let config = WayfarerConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.speech.language, "en-GB");
    /// assert!(config.map.api_key().is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; the format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, so deployments can rely on the environment alone.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use wayfarer_config::WayfarerConfigLoader;
    ///
    /// let cfg = WayfarerConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// speech:
    ///   language: "cy-GB"
    ///   rate: 0.8
    /// logging:
    ///   format: json
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.speech.language, "cy-GB");
    /// assert_eq!(cfg.speech.rate, Some(0.8));
    /// assert_eq!(cfg.logging.format, wayfarer_common::observability::LogFormat::Json);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder, expand `${VAR}` references and validate the result.
    pub fn load(self) -> Result<WayfarerConfig, ConfigError> {
        // Added last so the environment wins over every file.
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("WAYFARER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: WayfarerConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        validate(&typed)?;

        Ok(typed)
    }
}
