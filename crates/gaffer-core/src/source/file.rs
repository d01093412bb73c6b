// Offline source: the same JSON documents the HTTP API serves, laid out on
// disk.
//
//   <root>/bootstrap-static.json
//   <root>/fixtures.json
//   <root>/event/<gw>/live.json
//   <root>/entry/<id>/event/<gw>/picks.json

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

use super::{DataSource, SourceError};
use crate::fpl::{Bootstrap, EntryPicks, Fixture, LiveEvent};

pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSource { root: root.into() }
    }

    async fn read_json<T: DeserializeOwned>(&self, relative: &str) -> Result<T, SourceError> {
        let path = self.root.join(relative);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SourceError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
        serde_json::from_str(&text).map_err(|e| SourceError::Json {
            what: path.display().to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn bootstrap(&self) -> Result<Bootstrap, SourceError> {
        self.read_json("bootstrap-static.json").await
    }

    async fn fixtures(&self) -> Result<Vec<Fixture>, SourceError> {
        self.read_json("fixtures.json").await
    }

    async fn live_event(&self, gameweek: u32) -> Result<LiveEvent, SourceError> {
        let mut live: LiveEvent = self
            .read_json(&format!("event/{gameweek}/live.json"))
            .await?;
        live.event = gameweek;
        Ok(live)
    }

    async fn entry_picks(&self, entry_id: u64, gameweek: u32) -> Result<EntryPicks, SourceError> {
        self.read_json(&format!("entry/{entry_id}/event/{gameweek}/picks.json"))
            .await
    }
}
