use crate::config::ClientConfig;
use crate::types::{EmbedInput, EmbedParameters, EmbedRequest, EmbedResponse};
use crate::{expect_success, API_VERSION};
use anyhow::{anyhow, Context, Result};
use reqwest::Client;

/// Default hosted embedding model and its output dimensionality.
pub const DEFAULT_EMBED_MODEL: &str = "multilingual-e5-large";
pub const EMBED_DIMENSION: u32 = 1024;

/// Whether texts are embedded as stored passages or as queries. The model
/// is asymmetric; mixing the two degrades retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Passage,
    Query,
}

impl InputType {
    fn as_str(self) -> &'static str {
        match self {
            InputType::Passage => "passage",
            InputType::Query => "query",
        }
    }
}

/// Client for the hosted inference endpoint: given text, return a dense
/// vector of fixed dimension.
#[derive(Debug, Clone)]
pub struct EmbedClient {
    http: Client,
    config: ClientConfig,
    model: String,
}

impl EmbedClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config, model: DEFAULT_EMBED_MODEL.to_string() })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Embed a batch of texts. Returns one dense vector per input, in order.
    pub async fn embed(&self, input_type: InputType, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let url = self.config.api_base.join("embed")?;
        let request = EmbedRequest {
            model: &self.model,
            parameters: EmbedParameters { input_type: input_type.as_str(), truncate: "END" },
            inputs: texts.iter().map(|t| EmbedInput { text: t }).collect(),
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
        let body: EmbedResponse = resp.json().await.context("decoding embed response")?;
        if body.data.len() != texts.len() {
            return Err(anyhow!(
                "embed returned {} vectors for {} inputs",
                body.data.len(),
                texts.len()
            ));
        }
        Ok(body.data.into_iter().map(|e| e.values).collect())
    }
}
