#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::{CsvViewDefinition, RecordKind};
use crate::utils::error::{Result, StatsError};
use crate::utils::validation::{validate_optional_path, validate_required_field, validate_url, Validate};
use std::time::Duration;

/// Fully resolved options for one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub kind: RecordKind,
    pub pool_id: Option<String>,
    pub root_url: Option<String>,
    pub timeout: Option<Duration>,
    pub csv_file: Option<String>,
    pub json_file: Option<String>,
    pub from_json_file: Option<String>,
    pub full_datetimes: bool,
    pub csv_view: Option<&'static CsvViewDefinition>,
}

impl RunSettings {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            pool_id: None,
            root_url: None,
            timeout: None,
            csv_file: None,
            json_file: None,
            from_json_file: None,
            full_datetimes: false,
            csv_view: None,
        }
    }

    pub fn is_offline(&self) -> bool {
        self.from_json_file.is_some()
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        if !self.is_offline() {
            let root_url = self
                .root_url
                .as_deref()
                .ok_or_else(|| StatsError::MissingConfiguration {
                    message: "TASKCLUSTER_ROOT_URL is not set and no --from-json-file given"
                        .to_string(),
                })?;
            validate_url("root_url", root_url)?;

            if self.kind == RecordKind::Worker {
                validate_required_field("pool_id", &self.pool_id)?;
            }
        }

        validate_optional_path("csv_file", self.csv_file.as_deref())?;
        validate_optional_path("json_file", self.json_file.as_deref())?;
        validate_optional_path("from_json_file", self.from_json_file.as_deref())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_needs_no_root_url_or_pool() {
        let mut settings = RunSettings::new(RecordKind::Worker);
        settings.from_json_file = Some("workers.json".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_root_url() {
        let settings = RunSettings::new(RecordKind::WorkerPool);
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, StatsError::MissingConfiguration { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_missing_pool_id() {
        let mut settings = RunSettings::new(RecordKind::Worker);
        settings.root_url = Some("https://tc.example.com".to_string());
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, StatsError::MissingRequiredArgument { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_pools_need_no_pool_id() {
        let mut settings = RunSettings::new(RecordKind::WorkerPool);
        settings.root_url = Some("https://tc.example.com".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_export_path_rejected() {
        let mut settings = RunSettings::new(RecordKind::WorkerPool);
        settings.from_json_file = Some("pools.json".to_string());
        settings.csv_file = Some(String::new());
        assert!(settings.validate().is_err());
    }
}
