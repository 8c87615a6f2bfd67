use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::api::HnApi;
use crate::app::{HnfeedError, Result};
use crate::config::ApiConfig;
use crate::domain::FeedKind;

pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url.clone();
        url::Url::parse(&base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HnfeedError::Api {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl HnApi for HttpApi {
    async fn story_ids(&self, kind: FeedKind) -> Result<Vec<u64>> {
        let value = self.get_json(&kind.ids_path()).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(value)?)
    }

    async fn item(&self, id: u64) -> Result<Option<Value>> {
        let value = self.get_json(&format!("/item/{}.json", id)).await?;
        Ok(if value.is_null() { None } else { Some(value) })
    }
}
