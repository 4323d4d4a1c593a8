//! Seq2seq model abstraction and the process-wide model cache.

mod cache;
mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

pub use cache::ModelCache;
pub use http::{HttpModel, HttpModelLoader};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to load model {model}: {reason}")]
    Load { model: String, reason: String },
    #[error("inference request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("inference backend returned {status}: {body}")]
    Backend { status: u16, body: String },
    #[error("inference response had no generated text")]
    EmptyResponse,
}

/// Decoding parameters for a single generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    pub max_length: u32,
    pub num_beams: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_penalty: Option<f32>,
    pub early_stopping: bool,
    pub do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Input tokens beyond this are truncated by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncate: Option<u32>,
}

#[async_trait]
pub trait Seq2SeqModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, input: &str, params: &GenerationParams) -> Result<String, ModelError>;
}

#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, name: &str) -> Result<Arc<dyn Seq2SeqModel>, ModelError>;
}
