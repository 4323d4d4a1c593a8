use serde::{Deserialize, Serialize};

use crate::{
    documents::repo_types::TaskType,
    pipelines::{Complexity, SummaryLength},
    text::rouge::{RougePoint, RougeScores},
};

/// Pasted text or a previously uploaded document; the document wins when
/// both are given.
#[derive(Debug, Default, Deserialize)]
pub struct TextSource {
    pub text: Option<String>,
    pub document_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(flatten)]
    pub source: TextSource,
    #[serde(default)]
    pub length: SummaryLength,
}

#[derive(Debug, Deserialize)]
pub struct ParaphraseRequest {
    #[serde(flatten)]
    pub source: TextSource,
    #[serde(default)]
    pub complexity: Complexity,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub id: i64,
    pub model: String,
    pub original: String,
    pub summary: String,
    pub rouge: RougeScores,
    pub rouge_series: Vec<RougePoint>,
    pub original_words: usize,
    pub summary_words: usize,
    pub compression: f64,
    pub chunks: usize,
    pub recombined: bool,
}

#[derive(Debug, Serialize)]
pub struct ParaphraseResponse {
    pub id: i64,
    pub model: String,
    pub original: String,
    pub paraphrase: String,
    pub rouge: RougeScores,
    pub rouge_series: Vec<RougePoint>,
    pub original_words: usize,
    pub paraphrased_words: usize,
}

/// `?task=summary|paraphrase`; paging comes from `Pagination`.
#[derive(Debug, Deserialize)]
pub struct HistoryFilter {
    pub task: Option<TaskType>,
}
