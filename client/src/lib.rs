pub mod config;
pub mod embed;
pub mod index;
pub mod types;

pub use config::ClientConfig;
pub use embed::{EmbedClient, InputType, DEFAULT_EMBED_MODEL, EMBED_DIMENSION};
pub use index::{ControlClient, IndexHandle};
pub use types::{DocMetadata, IndexDescription, QueryMatch, QueryRequest, QueryResponse, VectorRecord};

/// REST API version header sent with every request.
pub(crate) const API_VERSION: &str = "2025-01";

/// Turn a non-2xx response into an error carrying status and body.
pub(crate) async fn expect_success(resp: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(anyhow::anyhow!("request failed with {status}: {body}"))
}
