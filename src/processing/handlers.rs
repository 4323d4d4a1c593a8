use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::dto::{
    HistoryFilter, ParaphraseRequest, ParaphraseResponse, SummarizeRequest, SummaryResponse,
    TextSource,
};
use crate::{
    auth::RequestContext,
    documents::{
        repo, Pagination,
        repo_types::{NewProcessedText, ProcessedText, TaskType},
    },
    outcome::{EmptyReason, Outcome},
    state::AppState,
    text::{
        compression_percentage, normalize,
        readability::{self, ReadabilityReport},
        rouge,
        word_count,
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/readability", post(readability))
        .route("/summarize", post(summarize))
        .route("/paraphrase", post(paraphrase))
        .route("/history", get(history))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn empty(reason: EmptyReason) -> (StatusCode, String) {
    let status = if reason.is_input_problem() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    warn!(%reason, "task produced no result");
    (status, reason.to_string())
}

/// Loads and normalizes the text a task should run on.
async fn resolve_text(
    state: &AppState,
    ctx: &RequestContext,
    source: TextSource,
) -> Result<String, (StatusCode, String)> {
    let raw = match source.document_id {
        Some(id) => {
            repo::get_uploaded_file(&state.db, &ctx.username, id)
                .await
                .map_err(internal)?
                .ok_or((StatusCode::NOT_FOUND, "Document not found".to_string()))?
                .file_content
        }
        None => source.text.unwrap_or_default(),
    };
    let text = normalize(&raw);
    if text.is_empty() {
        return Err(empty(EmptyReason::BlankInput));
    }
    Ok(text)
}

#[instrument(skip(state, ctx, source), fields(username = %ctx.username))]
pub async fn readability(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(source): Json<TextSource>,
) -> Result<Json<ReadabilityReport>, (StatusCode, String)> {
    let text = resolve_text(&state, &ctx, source).await?;
    match readability::assess(&text) {
        Outcome::Ready(report) => Ok(Json(report)),
        Outcome::Empty(reason) => Err(empty(reason)),
    }
}

#[instrument(skip(state, ctx, payload), fields(username = %ctx.username, length = ?payload.length))]
pub async fn summarize(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<SummarizeRequest>,
) -> Result<Json<SummaryResponse>, (StatusCode, String)> {
    let text = resolve_text(&state, &ctx, payload.source).await?;
    let summary = match state.summarizer.summarize(&text, payload.length).await {
        Outcome::Ready(s) => s,
        Outcome::Empty(reason) => return Err(empty(reason)),
    };

    let model = state.summarizer.model_name().to_string();
    let row = repo::insert_processed_text(
        &state.db,
        &NewProcessedText {
            username: &ctx.username,
            task_type: TaskType::Summary,
            original_text: &text,
            processed_text: &summary.text,
            model: &model,
        },
    )
    .await
    .map_err(internal)?;
    info!(id = row.id, chunks = summary.chunks, "summary stored");

    Ok(Json(SummaryResponse {
        id: row.id,
        model,
        original_words: word_count(&text),
        summary_words: word_count(&summary.text),
        compression: compression_percentage(&text, &summary.text),
        chunks: summary.chunks,
        recombined: summary.recombined,
        rouge_series: rouge::series(&summary.rouge),
        rouge: summary.rouge,
        summary: summary.text,
        original: text,
    }))
}

#[instrument(skip(state, ctx, payload), fields(username = %ctx.username, complexity = ?payload.complexity))]
pub async fn paraphrase(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<ParaphraseRequest>,
) -> Result<Json<ParaphraseResponse>, (StatusCode, String)> {
    let text = resolve_text(&state, &ctx, payload.source).await?;
    let para = match state.paraphraser.paraphrase(&text, payload.complexity).await {
        Outcome::Ready(p) => p,
        Outcome::Empty(reason) => return Err(empty(reason)),
    };

    let model = state.paraphraser.model_name().to_string();
    let row = repo::insert_processed_text(
        &state.db,
        &NewProcessedText {
            username: &ctx.username,
            task_type: TaskType::Paraphrase,
            original_text: &text,
            processed_text: &para.text,
            model: &model,
        },
    )
    .await
    .map_err(internal)?;
    info!(id = row.id, sentences = para.sentences, "paraphrase stored");

    Ok(Json(ParaphraseResponse {
        id: row.id,
        model,
        original_words: word_count(&text),
        paraphrased_words: word_count(&para.text),
        rouge_series: rouge::series(&para.rouge),
        rouge: para.rouge,
        paraphrase: para.text,
        original: text,
    }))
}

#[instrument(skip(state, ctx), fields(username = %ctx.username))]
pub async fn history(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(page): Query<Pagination>,
    Query(filter): Query<HistoryFilter>,
) -> Result<Json<Vec<ProcessedText>>, (StatusCode, String)> {
    let (limit, offset) = page.bounds();
    let rows = repo::list_processed_texts(&state.db, &ctx.username, filter.task, limit, offset)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}
