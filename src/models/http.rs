use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerationParams, ModelError, ModelLoader, Seq2SeqModel};

/// Builds handles to models served by a Hugging Face style inference
/// endpoint (`POST {base}/models/{name}`).
#[derive(Clone)]
pub struct HttpModelLoader {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpModelLoader {
    pub fn new(base_url: &str, api_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }
}

#[async_trait]
impl ModelLoader for HttpModelLoader {
    async fn load(&self, name: &str) -> Result<Arc<dyn Seq2SeqModel>, ModelError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::Load {
                model: name.to_string(),
                reason: "empty model name".into(),
            });
        }
        let url = format!("{}/models/{}", self.base_url, name);
        reqwest::Url::parse(&url).map_err(|e| ModelError::Load {
            model: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Arc::new(HttpModel {
            client: self.client.clone(),
            url,
            name: name.to_string(),
            api_token: self.api_token.clone(),
        }))
    }
}

pub struct HttpModel {
    client: reqwest::Client,
    url: String,
    name: String,
    api_token: Option<String>,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
}

#[derive(Debug, Deserialize)]
struct InferenceOutput {
    #[serde(alias = "generated_text", alias = "translation_text")]
    summary_text: Option<String>,
}

#[async_trait]
impl Seq2SeqModel for HttpModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, input: &str, params: &GenerationParams) -> Result<String, ModelError> {
        let mut req = self.client.post(&self.url).json(&InferenceRequest {
            inputs: input,
            parameters: params,
        });
        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token);
        }

        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ModelError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let outputs: Vec<InferenceOutput> = res.json().await?;
        let text = parse_first(outputs)?;
        debug!(model = %self.name, chars = text.len(), "generation done");
        Ok(text)
    }
}

fn parse_first(outputs: Vec<InferenceOutput>) -> Result<String, ModelError> {
    outputs
        .into_iter()
        .find_map(|o| o.summary_text)
        .ok_or(ModelError::EmptyResponse)
}
