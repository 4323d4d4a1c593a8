use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    models::{GenerationParams, ModelCache},
    outcome::{EmptyReason, Outcome},
    text::{
        normalize, rouge,
        sentences::{split_sentences, strip_trailing_dots},
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Basic,
    #[default]
    Medium,
    Advanced,
}

impl Complexity {
    pub fn params(self) -> GenerationParams {
        let (num_beams, max_length, temperature) = match self {
            Complexity::Basic => (3, 60, 0.7),
            Complexity::Medium => (5, 80, 0.9),
            Complexity::Advanced => (8, 100, 1.0),
        };
        GenerationParams {
            min_length: None,
            max_length,
            num_beams,
            length_penalty: None,
            early_stopping: false,
            do_sample: true,
            temperature: Some(temperature),
            truncate: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paraphrase {
    pub text: String,
    pub rouge: rouge::RougeScores,
    pub sentences: usize,
    pub rewritten: usize,
}

/// Rewrites text one sentence at a time; sentences do not see each other.
pub struct Paraphraser {
    models: ModelCache,
    model_name: String,
}

impl Paraphraser {
    pub fn new(models: ModelCache, model_name: impl Into<String>) -> Self {
        Self {
            models,
            model_name: model_name.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[instrument(skip(self, text), fields(model = %self.model_name))]
    pub async fn paraphrase(&self, text: &str, complexity: Complexity) -> Outcome<Paraphrase> {
        let text = text.trim();
        if text.is_empty() {
            return Outcome::Empty(EmptyReason::BlankInput);
        }

        let sentences = split_sentences(text);

        let model = match self.models.get(&self.model_name).await {
            Ok(m) => m,
            Err(_) => return Outcome::Empty(EmptyReason::ModelUnavailable(self.model_name.clone())),
        };

        let params = complexity.params();
        let mut rewritten = Vec::with_capacity(sentences.len());
        for (i, sentence) in sentences.iter().enumerate() {
            match model.generate(sentence, &params).await {
                Ok(out) => {
                    let out = strip_trailing_dots(&normalize(&out));
                    if !out.is_empty() {
                        rewritten.push(out);
                    }
                }
                Err(e) => warn!(sentence = i, error = %e, "sentence paraphrase failed"),
            }
        }

        if rewritten.is_empty() {
            return Outcome::Empty(EmptyReason::GenerationFailed);
        }

        let joined = rewritten.join(" ");
        info!(sentences = sentences.len(), rewritten = rewritten.len(), "paraphrase ready");
        Outcome::Ready(Paraphrase {
            rouge: rouge::score(text, &joined),
            text: joined,
            sentences: sentences.len(),
            rewritten: rewritten.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        testing::{FakeLoader, FakeModel},
        ModelError,
    };
    use std::sync::Arc;

    fn paraphraser(model: Arc<FakeModel>) -> Paraphraser {
        Paraphraser::new(ModelCache::new(FakeLoader::serving(model)), "pegasus")
    }

    #[test]
    fn complexity_decoding_tuples() {
        let p = Complexity::Basic.params();
        assert_eq!((p.num_beams, p.max_length, p.temperature), (3, 60, Some(0.7)));
        let p = Complexity::Medium.params();
        assert_eq!((p.num_beams, p.max_length, p.temperature), (5, 80, Some(0.9)));
        let p = Complexity::Advanced.params();
        assert_eq!((p.num_beams, p.max_length, p.temperature), (8, 100, Some(1.0)));
        assert!(p.do_sample);
    }

    #[tokio::test]
    async fn rewrites_each_sentence_independently() {
        let model = FakeModel::new("pegasus", |input, _| Ok(format!("{} Indeed...", input.to_uppercase())));
        let p = paraphraser(model.clone());

        let out = p
            .paraphrase("The sky is blue. Grass is green!", Complexity::Basic)
            .await
            .ready()
            .expect("paraphrase");

        let inputs: Vec<String> = model.calls().into_iter().map(|(i, _)| i).collect();
        assert_eq!(inputs, vec!["The sky is blue.", "Grass is green!"]);
        assert_eq!(out.text, "THE SKY IS BLUE. Indeed. GRASS IS GREEN! Indeed.");
        assert_eq!(out.sentences, 2);
        assert_eq!(out.rewritten, 2);
        assert_eq!(model.calls()[0].1, Complexity::Basic.params());
    }

    #[tokio::test]
    async fn failed_sentences_are_skipped() {
        let model = FakeModel::new("pegasus", |input, _| {
            if input.contains("fail") {
                Err(ModelError::EmptyResponse)
            } else {
                Ok(input.to_string())
            }
        });
        let out = paraphraser(model)
            .paraphrase("Keep this. This will fail. Keep that.", Complexity::Medium)
            .await
            .ready()
            .expect("paraphrase");
        assert_eq!(out.text, "Keep this. Keep that.");
        assert_eq!(out.sentences, 3);
        assert_eq!(out.rewritten, 2);
    }

    #[tokio::test]
    async fn every_sentence_failing_is_empty() {
        let model = FakeModel::new("pegasus", |_, _| Err(ModelError::EmptyResponse));
        let out = paraphraser(model).paraphrase("One. Two.", Complexity::Advanced).await;
        assert_eq!(out, Outcome::Empty(EmptyReason::GenerationFailed));
    }

    #[tokio::test]
    async fn blank_input_is_empty() {
        let model = FakeModel::echo_words("pegasus", 3);
        let out = paraphraser(model.clone()).paraphrase("  ", Complexity::Basic).await;
        assert_eq!(out, Outcome::Empty(EmptyReason::BlankInput));
        assert_eq!(model.call_count(), 0);
    }
}
