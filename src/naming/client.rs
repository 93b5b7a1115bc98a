//! Async client for the randomuser.me name service
//!
//! Tries the current API first and falls back to the older 0.8 revision,
//! whose payload nests the name one level deeper.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::core::config::NamingConfig;
use crate::core::error::NamingError;
use crate::naming::NameSource;

pub struct RandomUserClient {
    client: Client,
    primary_url: String,
    legacy_url: String,
}

impl RandomUserClient {
    pub fn new(config: &NamingConfig) -> Result<Self, NamingError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| NamingError::Http(e.to_string()))?;

        Ok(Self {
            client,
            primary_url: config.primary_url.clone(),
            legacy_url: config.legacy_url.clone(),
        })
    }

    async fn get_body(&self, url: &str) -> Result<String, NamingError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NamingError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NamingError::Status(response.status().as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| NamingError::Http(e.to_string()))
    }

    async fn fetch_current(&self) -> Result<String, NamingError> {
        let body = self.get_body(&self.primary_url).await?;
        parse_current(&body)
    }

    async fn fetch_legacy(&self) -> Result<String, NamingError> {
        let body = self.get_body(&self.legacy_url).await?;
        parse_legacy(&body)
    }
}

#[async_trait(?Send)]
impl NameSource for RandomUserClient {
    async fn fetch_name(&self) -> Result<String, NamingError> {
        match self.fetch_current().await {
            Ok(name) => return Ok(name),
            Err(e) => {
                tracing::warn!(error = %e, "primary name API failed, trying legacy API");
            }
        }

        self.fetch_legacy().await.map_err(|e| {
            tracing::warn!(error = %e, "legacy name API failed");
            NamingError::Exhausted
        })
    }
}

// Current API format
#[derive(Deserialize)]
struct CurrentResponse {
    results: Vec<CurrentResult>,
}

#[derive(Deserialize)]
struct CurrentResult {
    name: PersonName,
}

// 0.8 API format
#[derive(Deserialize)]
struct LegacyResponse {
    results: Vec<LegacyResult>,
}

#[derive(Deserialize)]
struct LegacyResult {
    user: LegacyUser,
}

#[derive(Deserialize)]
struct LegacyUser {
    name: PersonName,
}

// Shared
#[derive(Deserialize)]
struct PersonName {
    first: String,
    last: String,
}

impl PersonName {
    fn display(&self) -> Result<String, NamingError> {
        let full = format!("{} {}", self.first.trim(), self.last.trim());
        let full = full.trim();
        if full.is_empty() {
            return Err(NamingError::Malformed("empty name".into()));
        }
        Ok(full.to_string())
    }
}

/// Extract "First Last" from a current-API payload
pub fn parse_current(body: &str) -> Result<String, NamingError> {
    let response: CurrentResponse =
        serde_json::from_str(body).map_err(|e| NamingError::Malformed(e.to_string()))?;
    response
        .results
        .first()
        .ok_or_else(|| NamingError::Malformed("no results".into()))?
        .name
        .display()
}

/// Extract "First Last" from a 0.8-API payload
pub fn parse_legacy(body: &str) -> Result<String, NamingError> {
    let response: LegacyResponse =
        serde_json::from_str(body).map_err(|e| NamingError::Malformed(e.to_string()))?;
    response
        .results
        .first()
        .ok_or_else(|| NamingError::Malformed("no results".into()))?
        .user
        .name
        .display()
}
