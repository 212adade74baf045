//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! validate_check_digit: true
//! gcp_table: gcp-prefix-formats.json
//! ```
//!
//! A relative `gcp_table` path is resolved against the config file's
//! directory first, then the current directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gs1_convert::{ConversionOptions, Converter};
use gs1_gcp::PrefixTable;

/// Settings read from the `--config` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Reject Digital Link input whose check digit is wrong.
    pub validate_check_digit: bool,
    /// `GCPPrefixFormatList` JSON file used when no `--gcp-length` is given.
    pub gcp_table: Option<PathBuf>,
}

impl CliConfig {
    /// Load the config file, or the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        if let Some(table) = config.gcp_table.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.gcp_table = Some(resolve_path(&table, base));
        }
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Build a converter, with a prefix-table resolver when one is configured.
    ///
    /// `strict` forces check digit verification on regardless of the file.
    pub fn converter(&self, strict: bool) -> Result<Converter> {
        let converter = Converter::new(ConversionOptions {
            validate_check_digit: strict || self.validate_check_digit,
        });
        match &self.gcp_table {
            Some(path) => {
                let table = PrefixTable::from_path(path)
                    .with_context(|| format!("failed to load gcp_table: {}", path.display()))?;
                Ok(converter.with_resolver(Arc::new(table)))
            }
            None => Ok(converter),
        }
    }
}

/// Resolve a path that may be relative to `base`.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `base` is joined to it; otherwise it is left relative to the current
/// directory.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let relative = base.join(path);
    if relative.exists() {
        relative
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{"GCPPrefixFormatList": {"entry": [{"prefix": "234", "gcpLength": 6}]}}"#;

    #[test]
    fn missing_path_gives_defaults() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config, CliConfig::default());
        assert!(!config.converter(false).unwrap().has_resolver());
    }

    #[test]
    fn loads_yaml_and_resolves_table_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("prefixes.json"), TABLE).unwrap();
        let config_path = dir.path().join("gs1.yaml");
        std::fs::write(
            &config_path,
            "validate_check_digit: true\ngcp_table: prefixes.json\n",
        )
        .unwrap();

        let config = CliConfig::load(Some(&config_path)).unwrap();
        assert!(config.validate_check_digit);
        assert_eq!(config.gcp_table, Some(dir.path().join("prefixes.json")));

        let converter = config.converter(false).unwrap();
        assert!(converter.has_resolver());
        assert!(converter.options().validate_check_digit);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("gs1.yaml");
        std::fs::write(&config_path, "validate_checkdigit: true\n").unwrap();
        let err = CliConfig::load(Some(&config_path)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn missing_table_fails_converter_construction() {
        let config = CliConfig {
            validate_check_digit: false,
            gcp_table: Some(PathBuf::from("/nonexistent/prefixes.json")),
        };
        let err = config.converter(false).unwrap_err();
        assert!(err.to_string().contains("failed to load gcp_table"));
    }

    #[test]
    fn strict_flag_overrides_file() {
        let converter = CliConfig::default().converter(true).unwrap();
        assert!(converter.options().validate_check_digit);
    }

    #[test]
    fn resolve_path_prefers_existing_base_relative() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("t.json"), "{}").unwrap();
        assert_eq!(resolve_path(Path::new("t.json"), dir.path()), dir.path().join("t.json"));
        assert_eq!(resolve_path(Path::new("u.json"), dir.path()), PathBuf::from("u.json"));
        assert_eq!(resolve_path(Path::new("/abs.json"), dir.path()), PathBuf::from("/abs.json"));
    }
}
