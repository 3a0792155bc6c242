use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::SearchConfig,
    core::error::ScoutError,
    search::{Business, SearchBackend, SearchQuery},
};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Business>,
}

/// Client for the external listings API.
pub struct HttpSearchBackend {
    client: Client,
    base_url: String,
}

impl HttpSearchBackend {
    pub fn new(config: &SearchConfig) -> Result<Self, ScoutError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(4))
            .build()
            .map_err(ScoutError::from)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

impl SearchBackend for HttpSearchBackend {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Business>, ScoutError> {
        let limit = query.limit.to_string();
        let mut params = vec![("q", query.text.as_str()), ("limit", limit.as_str())];
        if let Some(location) = &query.location {
            params.push(("location", location.as_str()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;
        let body: SearchResponse = response.json().await?;
        Ok(body.results)
    }
}
