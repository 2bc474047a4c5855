use crate::utils::error::{Result, StatsError};
use crate::utils::validation::{validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file.
///
/// ```toml
/// [api]
/// root_url = "${TASKCLUSTER_ROOT_URL}"
/// timeout_seconds = 30
///
/// [output]
/// full_datetimes = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub root_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub full_datetimes: Option<bool>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StatsError::ConfigParse {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables expand
    /// to an empty string so they read as "not configured".
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StatsError::ConfigParse {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        Ok(result.to_string())
    }

    /// Root URL from the file, treating an empty string as absent.
    pub fn root_url(&self) -> Option<&str> {
        self.api.root_url.as_deref().filter(|url| !url.is_empty())
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = self.root_url() {
            validate_url("api.root_url", url)?;
        }
        if self.api.timeout_seconds == Some(0) {
            return Err(StatsError::InvalidConfigValue {
                field: "api.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Value must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let config = FileConfig::from_toml_str(
            r#"
[api]
root_url = "https://tc.example.com"
timeout_seconds = 30

[output]
full_datetimes = true
"#,
        )
        .unwrap();

        assert_eq!(config.root_url(), Some("https://tc.example.com"));
        assert_eq!(config.api.timeout_seconds, Some(30));
        assert_eq!(config.output.full_datetimes, Some(true));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sections_are_optional() {
        let config = FileConfig::from_toml_str("").unwrap();
        assert!(config.root_url().is_none());
        assert!(config.output.full_datetimes.is_none());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("WPS_TEST_ROOT_URL", "https://sub.example.com");
        let config = FileConfig::from_toml_str(
            r#"
[api]
root_url = "${WPS_TEST_ROOT_URL}"
"#,
        )
        .unwrap();
        assert_eq!(config.root_url(), Some("https://sub.example.com"));
    }

    #[test]
    fn test_unset_variable_reads_as_absent() {
        let config = FileConfig::from_toml_str(
            r#"
[api]
root_url = "${WPS_TEST_DEFINITELY_UNSET}"
"#,
        )
        .unwrap();
        assert!(config.root_url().is_none());
    }

    #[test]
    fn test_invalid_toml_and_values() {
        assert!(matches!(
            FileConfig::from_toml_str("[api").unwrap_err(),
            StatsError::ConfigParse { .. }
        ));

        let config = FileConfig::from_toml_str("[api]\ntimeout_seconds = 0\n").unwrap();
        assert!(config.validate().is_err());

        let config = FileConfig::from_toml_str("[api]\nroot_url = \"ftp://x\"\n").unwrap();
        assert!(config.validate().is_err());
    }
}
