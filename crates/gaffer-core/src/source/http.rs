// HTTP client for the public fantasy API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::{DataSource, SourceError};
use crate::config::ApiConfig;
use crate::fpl::{Bootstrap, EntryPicks, Fixture, LiveEvent};

pub struct HttpSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| SourceError::Http {
                url: base_url.to_string(),
                source: e,
            })?;
        Ok(HttpSource {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, SourceError> {
        HttpSource::new(
            &api.base_url,
            Duration::from_secs(api.timeout_secs),
            &api.user_agent,
        )
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = self.url(path);
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Http {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| SourceError::Http {
            url: url.clone(),
            source: e,
        })?;
        serde_json::from_str(&body).map_err(|e| SourceError::Json { what: url, source: e })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn bootstrap(&self) -> Result<Bootstrap, SourceError> {
        self.get_json("bootstrap-static/").await
    }

    async fn fixtures(&self) -> Result<Vec<Fixture>, SourceError> {
        self.get_json("fixtures/").await
    }

    async fn live_event(&self, gameweek: u32) -> Result<LiveEvent, SourceError> {
        let mut live: LiveEvent = self.get_json(&format!("event/{gameweek}/live/")).await?;
        live.event = gameweek;
        Ok(live)
    }

    async fn entry_picks(&self, entry_id: u64, gameweek: u32) -> Result<EntryPicks, SourceError> {
        self.get_json(&format!("entry/{entry_id}/event/{gameweek}/picks/"))
            .await
    }
}
