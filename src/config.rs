//! User configuration.
//!
//! Settings are read from `<config_dir>/lugat/config.toml` unless a path is given on the command
//! line. Every key is optional; command-line flags take precedence over the file.

use crate::error::{LugatError, Result};
use crate::render::entry::DEFAULT_STYLED_DICTIONARY;
use crate::ui::ThemeName;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "lugat";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_INPUT_POLL_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Dictionary dump to open when none is given on the command line
    pub dictionary: Option<PathBuf>,
    /// Dictionary id whose entries get subject-field abbreviation styling
    pub styled_dictionary: String,
    pub theme: ThemeName,
    /// Terminal event poll interval in milliseconds
    pub input_poll_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: None,
            styled_dictionary: DEFAULT_STYLED_DICTIONARY.to_string(),
            theme: ThemeName::default(),
            input_poll_ms: DEFAULT_INPUT_POLL_MS,
        }
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub dictionary: Option<PathBuf>,
    pub styled_dictionary: Option<String>,
    pub theme: Option<ThemeName>,
}

impl Config {
    /// `<config_dir>/lugat/config.toml`, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. The default location is optional: when it is absent the
    /// built-in defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(LugatError::config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    log::debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| {
            LugatError::file_error(format!("Cannot read {}", path.display()), err)
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|err| LugatError::config(format!("invalid config: {err}")))?;
        if config.input_poll_ms == 0 {
            return Err(LugatError::config("input_poll_ms must be greater than zero"));
        }
        Ok(config)
    }

    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(dictionary) = overrides.dictionary {
            self.dictionary = Some(dictionary);
        }
        if let Some(styled) = overrides.styled_dictionary {
            self.styled_dictionary = styled;
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        self
    }

    pub fn input_poll_interval(&self) -> Duration {
        Duration::from_millis(self.input_poll_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.styled_dictionary, "crh-ru");
        assert_eq!(config.input_poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn all_keys_are_read() {
        let config = Config::from_toml_str(
            r#"
            dictionary = "/usr/share/lugat/crh.json.gz"
            styled_dictionary = "ru-crh"
            theme = "high_contrast"
            input_poll_ms = 20
            "#,
        )
        .unwrap();

        assert_eq!(
            config.dictionary,
            Some(PathBuf::from("/usr/share/lugat/crh.json.gz"))
        );
        assert_eq!(config.styled_dictionary, "ru-crh");
        assert_eq!(config.theme, ThemeName::HighContrast);
        assert_eq!(config.input_poll_ms, 20);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        for contents in ["theme = ", "theme = \"neon\"", "colour = 1", "input_poll_ms = 0"] {
            match Config::from_toml_str(contents) {
                Err(LugatError::ConfigError { .. }) => {}
                other => panic!("expected ConfigError for {contents:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn overrides_win_over_file() {
        let config = Config::from_toml_str("theme = \"monochrome\"\ndictionary = \"a.json\"")
            .unwrap()
            .apply_overrides(ConfigOverrides {
                dictionary: Some(PathBuf::from("b.json")),
                styled_dictionary: None,
                theme: Some(ThemeName::Default),
            });

        assert_eq!(config.dictionary, Some(PathBuf::from("b.json")));
        assert_eq!(config.theme, ThemeName::Default);
        assert_eq!(config.styled_dictionary, "crh-ru");
    }

    #[test]
    fn explicit_path_is_loaded() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "styled_dictionary = \"crh-tr\"").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.styled_dictionary, "crh-tr");
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(LugatError::ConfigError { .. })
        ));
    }
}
