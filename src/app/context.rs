use std::path::Path;
use std::sync::Arc;

use crate::api::{HnApi, HnClient, HttpApi};
use crate::app::error::Result;
use crate::config::Config;

/// Shared handles for the CLI commands and the TUI.
pub struct AppContext {
    pub client: Arc<HnClient>,
    pub config: Config,
}

impl AppContext {
    /// Load the config file at `path` (or the default one) and build the context.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Config::load(path)?;
        Self::new(config)
    }

    /// Build the HTTP-backed client. `HN_API_BASE_URL` overrides the
    /// configured base url.
    pub fn new(mut config: Config) -> Result<Self> {
        config.api.apply_env();
        let api: Arc<dyn HnApi + Send + Sync> = Arc::new(HttpApi::new(&config.api)?);
        Ok(Self::with_api(api, config))
    }

    pub fn with_api(api: Arc<dyn HnApi + Send + Sync>, config: Config) -> Self {
        let client = Arc::new(HnClient::new(api, &config.cache));
        Self { client, config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::app::HnfeedError;
    use crate::config::ConfigError;
    use crate::domain::FeedKind;

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(matches!(
            AppContext::new(config),
            Err(HnfeedError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_load_reports_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[feed]\ncomment_limit = 0\n").unwrap();
        assert!(matches!(
            AppContext::load(Some(&path)),
            Err(HnfeedError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn test_load_applies_file_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[feed]\npage_size = 7\n").unwrap();
        let ctx = AppContext::load(Some(&path)).unwrap();
        assert_eq!(ctx.config.feed.page_size, 7);
    }

    #[test]
    fn test_context_with_mock_api() {
        let api = MockApi::new().with_ids(FeedKind::Job, vec![5]);
        let ctx = AppContext::with_api(Arc::new(api), Config::default());
        let ids = tokio_test::block_on(ctx.client.story_ids(FeedKind::Job)).unwrap();
        assert_eq!(*ids, vec![5]);
    }
}
