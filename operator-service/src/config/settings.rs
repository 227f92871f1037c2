// Expansion Settings
// Naming scheme and export section used when materializing subtasks

use crate::{ServiceError, ServiceResult};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How keys and values are written into generated subtask names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameEncoding {
    /// Raw canonical strings. Separator characters inside keys or values
    /// are not escaped, so distinct combinations may render the same name.
    #[default]
    Raw,
    /// `application/x-www-form-urlencoded` encoding of keys and values
    Percent,
}

/// Settings for the `for_each` expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ExpansionSettings {
    /// Prefix of every generated subtask name (default: `+for-`)
    pub name_prefix: String,

    /// Separator between `key=value` pairs (default: `&`)
    pub pair_separator: String,

    /// Separator between a key and its value (default: `=`)
    pub key_value_separator: String,

    pub name_encoding: NameEncoding,

    /// Section of each subtask config that receives the bindings
    /// (default: `_export`)
    pub export_key: String,
}

impl Default for ExpansionSettings {
    fn default() -> Self {
        Self {
            name_prefix: "+for-".to_string(),
            pair_separator: "&".to_string(),
            key_value_separator: "=".to_string(),
            name_encoding: NameEncoding::Raw,
            export_key: "_export".to_string(),
        }
    }
}

impl ExpansionSettings {
    /// Default settings file location (`~/.taskfan/settings.yaml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".taskfan").join("settings.yaml"))
    }

    /// Load settings from an explicit path, or from the default location
    /// when it exists, or fall back to built-in defaults.
    pub fn load(path: Option<&Path>) -> ServiceResult<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(default) if default.is_file() => {
                tracing::debug!(path = %default.display(), "loading expansion settings");
                Self::from_file(default)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ServiceResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate settings from a YAML string
    pub fn parse(content: &str) -> ServiceResult<Self> {
        let settings: ExpansionSettings = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if !self.name_prefix.starts_with('+') {
            return Err(ServiceError::InvalidInput(format!(
                "namePrefix must start with '+' so subtasks are read back as tasks, got '{}'",
                self.name_prefix
            )));
        }
        if self.pair_separator.is_empty() {
            return Err(ServiceError::InvalidInput(
                "pairSeparator must not be empty".to_string(),
            ));
        }
        if self.key_value_separator.is_empty() {
            return Err(ServiceError::InvalidInput(
                "keyValueSeparator must not be empty".to_string(),
            ));
        }
        if self.export_key.is_empty() {
            return Err(ServiceError::InvalidInput(
                "exportKey must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_name_encoding(mut self, encoding: NameEncoding) -> Self {
        self.name_encoding = encoding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = ExpansionSettings::default();
        assert_eq!(settings.name_prefix, "+for-");
        assert_eq!(settings.pair_separator, "&");
        assert_eq!(settings.key_value_separator, "=");
        assert_eq!(settings.name_encoding, NameEncoding::Raw);
        assert_eq!(settings.export_key, "_export");
    }

    #[test]
    fn test_parse_partial_settings() {
        let settings =
            ExpansionSettings::parse("namePrefix: \"+each-\"\nnameEncoding: percent\n").unwrap();
        assert_eq!(settings.name_prefix, "+each-");
        assert_eq!(settings.name_encoding, NameEncoding::Percent);
        assert_eq!(settings.pair_separator, "&");
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(
            ExpansionSettings::parse("  \n").unwrap(),
            ExpansionSettings::default()
        );
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        let err = ExpansionSettings::parse("prefix: \"+x-\"\n").unwrap_err();
        assert!(matches!(err, ServiceError::Yaml(_)));
    }

    #[test]
    fn test_parse_rejects_empty_separator() {
        let err = ExpansionSettings::parse("pairSeparator: \"\"\n").unwrap_err();
        assert!(err.to_string().contains("pairSeparator"));
    }

    #[test]
    fn test_parse_rejects_prefix_without_plus() {
        for prefix in ["\"\"", "each-", "_parallel"] {
            let err = ExpansionSettings::parse(&format!("namePrefix: {}\n", prefix)).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
            assert!(err.to_string().contains("namePrefix"));
        }
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "exportKey: params").unwrap();

        let settings = ExpansionSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.export_key, "params");
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let temp = tempfile::tempdir().unwrap();
        let err = ExpansionSettings::load(Some(&temp.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
    }
}
