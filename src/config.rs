//! Console settings.
//!
//! With the `settings` feature the settings can be loaded from and saved to
//! a RON file:
//!
//! ```ron
//! (
//!     max_vars: 1024,
//!     max_commands: 128,
//!     save_file: Some("console_save.txt"),
//!     echo_input: false,
//! )
//! ```
//!
//! Missing fields take their default value.

use std::path::PathBuf;

use bevy::prelude::*;

use crate::core::{
    ConsoleLimits, DEFAULT_MAX_COMMANDS, DEFAULT_MAX_LINE_LEN, DEFAULT_MAX_TOKENS,
    DEFAULT_MAX_VARS,
};

/// Resource holding console configuration.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "settings", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "settings", serde(default))]
pub struct ConsoleSettings {
    /// Maximum number of registered variables.
    pub max_vars: usize,
    /// Maximum number of registered commands.
    pub max_commands: usize,
    /// Longest accepted line, in bytes.
    pub max_line_len: usize,
    /// Most tokens accepted on one line.
    pub max_tokens: usize,
    /// Save file loaded at startup and written on exit. `None` disables both.
    pub save_file: Option<PathBuf>,
    /// Register `TRUE`, `FALSE`, `inspect`, `echo`, and `set`.
    pub standard_library: bool,
    /// Echo each submitted line as `$ <line>` before its output.
    pub echo_input: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            max_vars: DEFAULT_MAX_VARS,
            max_commands: DEFAULT_MAX_COMMANDS,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            max_tokens: DEFAULT_MAX_TOKENS,
            save_file: None,
            standard_library: true,
            echo_input: true,
        }
    }
}

impl ConsoleSettings {
    /// Set the save file.
    pub fn with_save_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_file = Some(path.into());
        self
    }

    /// The limits to build a [`Console`](crate::core::Console) with.
    pub fn limits(&self) -> ConsoleLimits {
        ConsoleLimits {
            max_commands: self.max_commands,
            max_vars: self.max_vars,
            max_line_len: self.max_line_len,
            max_tokens: self.max_tokens,
        }
    }
}

#[cfg(feature = "settings")]
mod file {
    use std::fs;
    use std::path::Path;

    use thiserror::Error;

    use super::ConsoleSettings;

    /// Errors that can occur while reading or writing a settings file.
    #[derive(Debug, Error)]
    pub enum SettingsError {
        /// IO error (path, message).
        #[error("IO error for '{0}': {1}")]
        Io(String, String),
        /// Parse error (path, message).
        #[error("Parse error for '{0}': {1}")]
        Parse(String, String),
        /// Serialization error.
        #[error("Serialization error: {0}")]
        Serialize(String),
    }

    impl ConsoleSettings {
        /// Load settings from a RON file.
        pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
            let path = path.as_ref();
            let contents = fs::read_to_string(path)
                .map_err(|e| SettingsError::Io(path.display().to_string(), e.to_string()))?;

            ron::from_str(&contents)
                .map_err(|e| SettingsError::Parse(path.display().to_string(), e.to_string()))
        }

        /// Save settings to a RON file, creating parent directories if needed.
        pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
            let path = path.as_ref();

            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent).map_err(|e| {
                        SettingsError::Io(parent.display().to_string(), e.to_string())
                    })?;
                }
            }

            let pretty = ron::ser::PrettyConfig::new().depth_limit(2);
            let contents = ron::ser::to_string_pretty(self, pretty)
                .map_err(|e| SettingsError::Serialize(e.to_string()))?;

            fs::write(path, contents)
                .map_err(|e| SettingsError::Io(path.display().to_string(), e.to_string()))
        }

        /// Load settings from file, returning defaults if it is missing or invalid.
        pub fn load_or_default(path: impl AsRef<Path>) -> Self {
            Self::load(path).unwrap_or_default()
        }
    }
}

#[cfg(feature = "settings")]
pub use file::SettingsError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_console_limits() {
        let settings = ConsoleSettings::default();
        assert_eq!(settings.limits(), ConsoleLimits::default());
        assert!(settings.standard_library);
        assert!(settings.save_file.is_none());
    }

    #[test]
    fn test_with_save_file() {
        let settings = ConsoleSettings::default().with_save_file("console_save.txt");
        assert_eq!(settings.save_file, Some(PathBuf::from("console_save.txt")));
    }

    #[cfg(feature = "settings")]
    mod settings_file {
        use super::*;
        use std::io::Write;
        use tempfile::{tempdir, NamedTempFile};

        #[test]
        fn test_settings_roundtrip() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("cfg").join("console.ron");

            let settings = ConsoleSettings {
                max_vars: 16,
                echo_input: false,
                ..ConsoleSettings::default()
            }
            .with_save_file("save.txt");
            settings.save(&path).unwrap();

            assert_eq!(ConsoleSettings::load(&path).unwrap(), settings);
        }

        #[test]
        fn test_partial_file_uses_defaults() {
            let mut temp = NamedTempFile::new().unwrap();
            temp.write_all(b"(max_tokens: 8, standard_library: false)").unwrap();
            temp.flush().unwrap();

            let settings = ConsoleSettings::load(temp.path()).unwrap();
            assert_eq!(settings.max_tokens, 8);
            assert!(!settings.standard_library);
            assert_eq!(settings.max_vars, DEFAULT_MAX_VARS);
        }

        #[test]
        fn test_load_missing_and_invalid() {
            assert!(matches!(
                ConsoleSettings::load("nonexistent_settings.ron"),
                Err(SettingsError::Io(..))
            ));
            assert_eq!(
                ConsoleSettings::load_or_default("nonexistent_settings.ron"),
                ConsoleSettings::default()
            );

            let mut temp = NamedTempFile::new().unwrap();
            temp.write_all(b"(max_vars: \"many\")").unwrap();
            temp.flush().unwrap();
            assert!(matches!(
                ConsoleSettings::load(temp.path()),
                Err(SettingsError::Parse(..))
            ));
        }
    }
}
