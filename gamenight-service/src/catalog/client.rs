//! BoardGameGeek XML API2 client.
//!
//! Every outbound call goes through the shared [`RequestThrottle`] first, so one
//! client instance never issues more than one request per configured interval.

use super::error::CatalogError;
use super::throttle::RequestThrottle;
use super::xml::{self, DetailRecord, SearchRecord};
use crate::config::CatalogConfig;
use crate::services::metrics::{record_catalog_request, record_throttle_wait};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use std::time::Instant;

const BOARDGAME_TYPE: &str = "boardgame";

#[derive(Clone)]
pub struct BggClient {
    client: Client,
    base_url: String,
    api_token: Option<Secret<String>>,
    throttle: Arc<RequestThrottle>,
}

impl BggClient {
    pub fn new(config: &CatalogConfig) -> Self {
        Self::with_throttle(
            config,
            Arc::new(RequestThrottle::new(config.min_interval())),
        )
    }

    /// Builds a client sharing an existing throttle.
    pub fn with_throttle(config: &CatalogConfig, throttle: Arc<RequestThrottle>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            throttle,
        }
    }

    pub fn throttle(&self) -> &Arc<RequestThrottle> {
        &self.throttle
    }

    /// Searches board games by name. No matches is an empty list.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchRecord>, CatalogError> {
        let started = Instant::now();
        let result = self.search_inner(query).await;
        record_catalog_request("search", outcome(&result), started.elapsed());

        match &result {
            Ok(records) => tracing::info!(query, count = records.len(), "BGG search completed"),
            Err(e) => tracing::error!(query, error = %e, status = %e.status(), "BGG search failed"),
        }
        result
    }

    /// Fetches the full record of one board game.
    pub async fn get_details(&self, bgg_id: i64) -> Result<DetailRecord, CatalogError> {
        let started = Instant::now();
        let result = self.get_details_inner(bgg_id).await;
        record_catalog_request("thing", outcome(&result), started.elapsed());

        if let Err(e) = &result {
            tracing::error!(bgg_id, error = %e, status = %e.status(), "BGG details lookup failed");
        }
        result
    }

    async fn search_inner(&self, query: &str) -> Result<Vec<SearchRecord>, CatalogError> {
        let url = format!("{}/search", self.base_url);
        let body = self
            .fetch(&url, &[("query", query), ("type", BOARDGAME_TYPE)])
            .await
            .map_err(|e| CatalogError::upstream(format!("Failed to search BGG: {}", e), e))?;

        xml::parse_search(&body)
            .map_err(|e| CatalogError::upstream(format!("Failed to search BGG: {}", e), e))
    }

    async fn get_details_inner(&self, bgg_id: i64) -> Result<DetailRecord, CatalogError> {
        let url = format!("{}/thing", self.base_url);
        let id = bgg_id.to_string();
        let detail = |e: &dyn std::fmt::Display| {
            format!("Failed to fetch BGG game details for {}: {}", bgg_id, e)
        };

        let body = self
            .fetch(&url, &[("id", id.as_str()), ("type", BOARDGAME_TYPE)])
            .await
            .map_err(|e| CatalogError::upstream(detail(&e), e))?;

        xml::parse_details(&body, bgg_id)
            .map_err(|e| CatalogError::upstream(detail(&e), e))?
            .ok_or(CatalogError::NotFound(bgg_id))
    }

    /// Throttled GET returning the response body. Non-2xx answers are errors
    /// carrying the upstream status.
    async fn fetch(&self, url: &str, params: &[(&str, &str)]) -> Result<String, reqwest::Error> {
        let waited = self.throttle.acquire().await;
        record_throttle_wait(waited);

        tracing::debug!(url, ?params, "Dispatching BGG request");

        let mut request = self.client.get(url).query(params);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        request.send().await?.error_for_status()?.text().await
    }
}

fn outcome<T>(result: &Result<T, CatalogError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(CatalogError::NotFound(_)) => "not_found",
        Err(CatalogError::Upstream { .. }) => "error",
    }
}
