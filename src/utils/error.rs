use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API request to {url} failed with status {status}")]
    ApiStatus { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed timestamp on row {row} for {field}: {value:?}")]
    MalformedTimestamp {
        row: usize,
        field: String,
        value: String,
    },

    #[error("Flattening produced duplicate key: {key}")]
    DuplicateFlattenedKey { key: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {message}")]
    MissingConfiguration { message: String },

    #[error("Missing required argument: {argument}")]
    MissingRequiredArgument { argument: String },

    #[error("Invalid configuration value for {field}: {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },
}

impl StatsError {
    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            StatsError::MissingConfiguration { .. }
            | StatsError::MissingRequiredArgument { .. }
            | StatsError::InvalidConfigValue { .. }
            | StatsError::ConfigParse { .. } => 1,
            StatsError::MalformedTimestamp { .. }
            | StatsError::DuplicateFlattenedKey { .. }
            | StatsError::InvalidField { .. } => 2,
            StatsError::ApiError(_)
            | StatsError::ApiStatus { .. }
            | StatsError::CsvError(_)
            | StatsError::IoError(_)
            | StatsError::SerializationError(_) => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            StatsError::MissingConfiguration { .. } => {
                "TASKCLUSTER_ROOT_URL not in environment, see README.md".to_string()
            }
            StatsError::MissingRequiredArgument { argument } => {
                format!("The following arguments are required: {}", argument)
            }
            StatsError::MalformedTimestamp { row, field, value } => format!(
                "Failed to match datetime on row {} for {} with value {:?}",
                row, field, value
            ),
            StatsError::ApiStatus { url, status } => {
                format!("Worker Manager returned HTTP {} for {}", status, url)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_kind() {
        let missing = StatsError::MissingConfiguration {
            message: "no root url".to_string(),
        };
        assert_eq!(missing.exit_code(), 1);

        let data = StatsError::DuplicateFlattenedKey {
            key: "a_b".to_string(),
        };
        assert_eq!(data.exit_code(), 2);

        let io = StatsError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.exit_code(), 3);
    }

    #[test]
    fn test_missing_configuration_hint() {
        let err = StatsError::MissingConfiguration {
            message: "no root url".to_string(),
        };
        assert!(err.user_friendly_message().contains("README.md"));
    }
}
