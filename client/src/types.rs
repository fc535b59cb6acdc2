use hybrid_core::SparseVector;
use serde::{Deserialize, Serialize};

/// Free-form metadata stored next to each vector and echoed back on query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMetadata {
    pub title: String,
    pub content: String,
}

/// One stored entry: dense values plus an optional sparse counterpart.
#[derive(Debug, Clone, Serialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparse_values: Option<SparseVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DocMetadata>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpsertRequest<'a> {
    pub vectors: &'a [VectorRecord],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertResponse {
    #[serde(default)]
    pub upserted_count: u32,
}

/// Hybrid query: dense vector always present, sparse vector when the query
/// has in-vocabulary terms. The data plane speaks camelCase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub top_k: u32,
    pub vector: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparse_vector: Option<SparseVector>,
    pub include_metadata: bool,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub matches: Vec<QueryMatch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    pub metadata: Option<DocMetadata>,
}

/// Control-plane description of an index. `host` is the data-plane endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    pub dimension: u32,
    pub metric: String,
    pub host: String,
    #[serde(default)]
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexStatus {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateIndexRequest<'a> {
    pub name: &'a str,
    pub dimension: u32,
    pub metric: &'a str,
    pub spec: IndexSpec<'a>,
    pub deletion_protection: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct IndexSpec<'a> {
    pub serverless: ServerlessSpec<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ServerlessSpec<'a> {
    pub cloud: &'a str,
    pub region: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbedRequest<'a> {
    pub model: &'a str,
    pub parameters: EmbedParameters<'a>,
    pub inputs: Vec<EmbedInput<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbedParameters<'a> {
    pub input_type: &'a str,
    pub truncate: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbedInput<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbedResponse {
    pub data: Vec<Embedding>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Embedding {
    pub values: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hybrid_core::SparseVector;

    #[test]
    fn query_request_uses_camel_case_on_the_wire() {
        let req = QueryRequest {
            top_k: 3,
            vector: vec![0.1, 0.2],
            sparse_vector: Some(SparseVector::from_weights(vec![(4, 0.5)])),
            include_metadata: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["topK"], 3);
        assert_eq!(json["includeMetadata"], true);
        assert_eq!(json["sparseVector"]["indices"][0], 4);
    }

    #[test]
    fn record_omits_absent_sparse_values() {
        let rec = VectorRecord { id: "1".into(), values: vec![0.0], sparse_values: None, metadata: None };
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("sparse_values").is_none());
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn query_response_tolerates_missing_metadata() {
        let body = r#"{"matches":[{"id":"7","score":1.25}]}"#;
        let resp: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.matches[0].id, "7");
        assert!(resp.matches[0].metadata.is_none());
    }

    #[test]
    fn create_index_request_shape() {
        let req = CreateIndexRequest {
            name: "essays",
            dimension: 1024,
            metric: "dotproduct",
            spec: IndexSpec { serverless: ServerlessSpec { cloud: "aws", region: "us-east-1" } },
            deletion_protection: "disabled",
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["spec"]["serverless"]["cloud"], "aws");
        assert_eq!(json["deletion_protection"], "disabled");
    }
}
