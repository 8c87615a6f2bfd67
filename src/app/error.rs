use thiserror::Error;

#[derive(Error, Debug)]
pub enum HnfeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HN API error {status} for {path}")]
    Api { status: u16, path: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HnfeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_names_status_and_path() {
        let err = HnfeedError::Api {
            status: 503,
            path: "/topstories.json".into(),
        };
        assert_eq!(err.to_string(), "HN API error 503 for /topstories.json");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: HnfeedError = io.into();
        assert!(matches!(err, HnfeedError::Io(_)));
    }

    #[test]
    fn test_config_error_converts() {
        let err: HnfeedError = crate::config::ConfigError::NoConfigDir.into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Could not determine config directory"
        );
    }
}
