#![deny(warnings)]
#![deny(rust_2018_idioms)]

use async_trait::async_trait;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http_client::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, HttpClient, RequestBuilder, StatusCode};
use pelorus_core::{
    AggregationRound, AisPing, BackendError, BackendHealth, QueryShape, ScrollCursor, SearchDay,
    VesselSearchOutbound,
};
use snafu::{ResultExt, ensure};
use tracing::info;

mod error;
mod model;
mod query;
mod response;
pub mod settings;

pub use error::{Error, Result};
pub use settings::Settings;

use crate::{
    error::error::{BulkSnafu, HttpSnafu, SerializeSnafu},
    model::{BulkResponse, EsPing},
    response::{ClusterHealth, SearchResponse},
    settings::DEFAULT_SCROLL_TTL,
};

/// How many documents go into a single `_bulk` request.
const BULK_CHUNK_SIZE: usize = 5000;

#[derive(Debug, Clone)]
pub struct ElasticsearchAdapter {
    client: HttpClient,
    host: String,
    index: String,
    api_key: Option<String>,
    scroll_ttl: String,
}

impl ElasticsearchAdapter {
    pub fn new(settings: &Settings) -> Self {
        let client = HttpClient::builder()
            .timeout(settings.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .max_retries(settings.max_retries.unwrap_or(DEFAULT_MAX_RETRIES))
            .build();

        Self {
            client,
            host: settings.host.trim_end_matches('/').into(),
            index: settings.index.clone(),
            api_key: settings.api_key.clone(),
            scroll_ttl: format!(
                "{}s",
                settings.scroll_ttl.unwrap_or(DEFAULT_SCROLL_TTL).as_secs()
            ),
        }
    }

    /// Creates the vessel index with an explicit mapping. Dynamically
    /// mapped legacy indexes lack the combined coordinate field and
    /// force the latitude-only aggregation shape, bootstrapped ones
    /// support both.
    pub async fn create_index(&self) -> Result<()> {
        self.authorized(self.client.put(format!("{}/{}", self.host, self.index)))
            .json(&query::index_mapping())
            .send()
            .await
            .context(HttpSnafu)?;
        Ok(())
    }

    pub async fn index_exists(&self) -> Result<bool> {
        let result = self
            .authorized(self.client.head(format!("{}/{}", self.host, self.index)))
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(error) if error.status() == Some(StatusCode::NOT_FOUND) => Ok(false),
            Err(error) => Err(error).context(HttpSnafu),
        }
    }

    /// Indexes position reports through `_bulk` in bounded chunks, one
    /// action line and one document line per report. Returns the number
    /// of indexed documents.
    pub async fn add_pings(&self, pings: &[AisPing]) -> Result<usize> {
        let mut indexed = 0;

        for chunk in pings.chunks(BULK_CHUNK_SIZE) {
            let mut body = String::new();
            for ping in chunk {
                body.push_str(&query::bulk_action(&self.index).to_string());
                body.push('\n');
                body.push_str(
                    &serde_json::to_string(&EsPing::from(ping)).context(SerializeSnafu)?,
                );
                body.push('\n');
            }

            let response = self
                .authorized(self.client.post(format!("{}/_bulk", self.host)))
                .header(CONTENT_TYPE, "application/x-ndjson")
                .body(body)
                .send()
                .await
                .context(HttpSnafu)?
                .json::<BulkResponse>()
                .await
                .context(HttpSnafu)?;

            let failures = response.failed();
            ensure!(failures == 0, BulkSnafu { failures });

            indexed += chunk.len();
            info!("indexed {indexed} of {} documents", pings.len());
        }

        Ok(indexed)
    }

    async fn open_tracks_impl(
        &self,
        day: SearchDay,
        shape: QueryShape,
        vessels_per_round: u32,
    ) -> Result<AggregationRound> {
        let response = self
            .authorized(
                self.client
                    .post(format!("{}/{}/_search", self.host, self.index)),
            )
            .query(&[("scroll", self.scroll_ttl.as_str())])
            .json(&query::track_aggregation(day, shape, vessels_per_round))
            .send()
            .await
            .context(HttpSnafu)?
            .json::<SearchResponse>()
            .await
            .context(HttpSnafu)?;

        response.into_round()
    }

    async fn continue_tracks_impl(&self, cursor: &ScrollCursor) -> Result<AggregationRound> {
        let response = self
            .authorized(self.client.post(format!("{}/_search/scroll", self.host)))
            .json(&query::scroll_continuation(&self.scroll_ttl, cursor))
            .send()
            .await
            .context(HttpSnafu)?
            .json::<SearchResponse>()
            .await
            .context(HttpSnafu)?;

        response.into_round()
    }

    async fn release_cursor_impl(&self, cursor: ScrollCursor) -> Result<()> {
        self.authorized(self.client.delete(format!("{}/_search/scroll", self.host)))
            .json(&query::scroll_release(&cursor))
            .send()
            .await
            .context(HttpSnafu)?;
        Ok(())
    }

    async fn health_impl(&self) -> Result<BackendHealth> {
        let health = self
            .authorized(self.client.get(format!("{}/_cluster/health", self.host)))
            .send()
            .await
            .context(HttpSnafu)?
            .json::<ClusterHealth>()
            .await
            .context(HttpSnafu)?;

        Ok(BackendHealth {
            status: health.status,
            nodes: health.number_of_nodes,
            index_exists: self.index_exists().await?,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(AUTHORIZATION, format!("ApiKey {key}")),
            None => request,
        }
    }
}

#[async_trait]
impl VesselSearchOutbound for ElasticsearchAdapter {
    async fn open_tracks(
        &self,
        day: SearchDay,
        shape: QueryShape,
        vessels_per_round: u32,
    ) -> Result<AggregationRound, BackendError> {
        Ok(self.open_tracks_impl(day, shape, vessels_per_round).await?)
    }

    async fn continue_tracks(
        &self,
        cursor: &ScrollCursor,
    ) -> Result<AggregationRound, BackendError> {
        Ok(self.continue_tracks_impl(cursor).await?)
    }

    async fn release_cursor(&self, cursor: ScrollCursor) -> Result<(), BackendError> {
        Ok(self.release_cursor_impl(cursor).await?)
    }

    async fn health(&self) -> Result<BackendHealth, BackendError> {
        Ok(self.health_impl().await?)
    }
}
