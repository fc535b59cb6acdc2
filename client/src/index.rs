use crate::config::ClientConfig;
use crate::types::{
    CreateIndexRequest, IndexDescription, IndexSpec, QueryRequest, QueryResponse, ServerlessSpec,
    UpsertRequest, UpsertResponse, VectorRecord,
};
use crate::{expect_success, API_VERSION};
use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);
const READY_POLL_ATTEMPTS: u32 = 60;

/// Control-plane client: index lifecycle and host discovery.
#[derive(Debug, Clone)]
pub struct ControlClient {
    http: Client,
    config: ClientConfig,
}

impl ControlClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub async fn describe_index(&self, name: &str) -> Result<Option<IndexDescription>> {
        let url = self.config.api_base.join(&format!("indexes/{name}"))?;
        let resp = self
            .http
            .get(url)
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = expect_success(resp).await?;
        let desc = resp.json().await.context("decoding index description")?;
        Ok(Some(desc))
    }

    pub async fn has_index(&self, name: &str) -> Result<bool> {
        Ok(self.describe_index(name).await?.is_some())
    }

    pub async fn create_index(
        &self,
        name: &str,
        dimension: u32,
        metric: &str,
        cloud: &str,
        region: &str,
    ) -> Result<IndexDescription> {
        let url = self.config.api_base.join("indexes")?;
        let request = CreateIndexRequest {
            name,
            dimension,
            metric,
            spec: IndexSpec { serverless: ServerlessSpec { cloud, region } },
            deletion_protection: "disabled",
        };
        let resp = self
            .http
            .post(url)
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await?;
        let resp = expect_success(resp).await?;
        let desc = resp.json().await.context("decoding created index description")?;
        tracing::info!(name, dimension, metric, "created index");
        Ok(desc)
    }

    /// Describe the index, creating it when missing, and wait until it is
    /// ready to serve. Errors if an existing index has a different dimension.
    pub async fn ensure_index(
        &self,
        name: &str,
        dimension: u32,
        metric: &str,
        cloud: &str,
        region: &str,
    ) -> Result<IndexDescription> {
        let mut desc = match self.describe_index(name).await? {
            Some(desc) => desc,
            None => self.create_index(name, dimension, metric, cloud, region).await?,
        };
        if desc.dimension != dimension {
            return Err(anyhow!(
                "index {name} has dimension {}, expected {dimension}",
                desc.dimension
            ));
        }
        let mut attempts = 0;
        while !desc.status.ready {
            attempts += 1;
            if attempts > READY_POLL_ATTEMPTS {
                return Err(anyhow!("index {name} did not become ready"));
            }
            tracing::debug!(name, state = %desc.status.state, "waiting for index");
            tokio::time::sleep(READY_POLL_INTERVAL).await;
            desc = self
                .describe_index(name)
                .await?
                .ok_or_else(|| anyhow!("index {name} disappeared while waiting"))?;
        }
        Ok(desc)
    }

    /// Data-plane handle for a described index.
    pub fn index(&self, desc: &IndexDescription) -> Result<IndexHandle> {
        IndexHandle::new(&self.config, &desc.host)
    }
}

/// Data-plane client bound to one index host.
#[derive(Debug, Clone)]
pub struct IndexHandle {
    http: Client,
    api_key: String,
    base: Url,
}

impl IndexHandle {
    pub fn new(config: &ClientConfig, host: &str) -> Result<Self> {
        let base = if host.starts_with("http://") || host.starts_with("https://") {
            Url::parse(host)?
        } else {
            Url::parse(&format!("https://{host}"))?
        };
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, api_key: config.api_key.clone(), base })
    }

    pub async fn upsert(&self, vectors: &[VectorRecord]) -> Result<u32> {
        let url = self.base.join("vectors/upsert")?;
        let resp = self
            .http
            .post(url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&UpsertRequest { vectors })
            .send()
            .await?;
        let resp = expect_success(resp).await?;
        let body: UpsertResponse = resp.json().await.context("decoding upsert response")?;
        Ok(body.upserted_count)
    }

    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let url = self.base.join("query")?;
        let resp = self
            .http
            .post(url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(request)
            .send()
            .await?;
        let resp = expect_success(resp).await?;
        let body = resp.json().await.context("decoding query response")?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hosts_get_an_https_scheme() {
        let cfg = ClientConfig::new("key");
        let handle = IndexHandle::new(&cfg, "essays-abc123.svc.aped-4627-b74a.pinecone.io").unwrap();
        assert_eq!(handle.base.scheme(), "https");
        let handle = IndexHandle::new(&cfg, "http://localhost:5080").unwrap();
        assert_eq!(handle.base.scheme(), "http");
    }
}
