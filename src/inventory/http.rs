//! HTTP client for the inventory platform API.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::inventory::{Inventory, LinkResource, SwitchElement};

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 6;

pub struct HttpInventory {
    client: Client,
    base_url: String,
}

impl HttpInventory {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("link-cost-rebalancer/0.1")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()
            .expect("failed to build inventory HTTP client");
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl Inventory for HttpInventory {
    async fn find_element(&self, name: &str) -> Result<Option<SwitchElement>> {
        let url = format!("{}/api/elements/{name}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed GET request: {url}"))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed reading response body: {url}"))?;
        if !status.is_success() {
            let preview: String = body.chars().take(180).collect();
            return Err(anyhow!("GET {url} returned {status}: {preview}"));
        }
        let element: SwitchElement =
            serde_json::from_str(&body).with_context(|| format!("invalid JSON response: {url}"))?;
        Ok(Some(element))
    }

    async fn list_link_resources(
        &self,
        pool: &str,
        domain_id: u32,
        element_id: u32,
    ) -> Result<Vec<LinkResource>> {
        let url = format!("{}/api/resources", self.base_url);
        let domain = domain_id.to_string();
        let element = element_id.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("pool", pool),
                ("domain", domain.as_str()),
                ("element", element.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("failed GET request: {url}"))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed reading response body: {url}"))?;
        if !status.is_success() {
            let preview: String = body.chars().take(180).collect();
            return Err(anyhow!("GET {url} returned {status}: {preview}"));
        }
        serde_json::from_str(&body).with_context(|| format!("invalid JSON response: {url}"))
    }

    async fn upsert_resources(&self, resources: &[LinkResource]) -> Result<()> {
        let url = format!("{}/api/resources/batch", self.base_url);
        self.client
            .post(&url)
            .json(resources)
            .send()
            .await
            .with_context(|| format!("failed POST request: {url}"))?
            .error_for_status()
            .with_context(|| format!("inventory rejected resource batch: {url}"))?;
        Ok(())
    }
}
