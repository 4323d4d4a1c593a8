use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::{error, info, instrument, warn};

use super::{
    dto::{Pagination, UploadResponse},
    extract::{extract_text, DocumentKind},
    repo,
    repo_types::{UploadedFile, UploadedFileListItem},
};
use crate::{auth::RequestContext, state::AppState, text::word_count};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", post(upload_document).get(list_documents))
        .route("/documents/:id", get(get_document))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// POST /documents (multipart, field `file`)
#[instrument(skip(state, ctx, mp), fields(username = %ctx.username))]
pub async fn upload_document(
    State(state): State<AppState>,
    ctx: RequestContext,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), (StatusCode, String)> {
    let mut upload: Option<(String, Option<String>, Bytes)> = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("uploaded_document").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        upload = Some((file_name, content_type, bytes));
        break;
    }
    let (file_name, content_type, bytes) =
        upload.ok_or((StatusCode::BAD_REQUEST, "file is required".to_string()))?;

    let text = DocumentKind::detect(content_type.as_deref(), &file_name)
        .and_then(|kind| extract_text(kind, &bytes))
        .map_err(|e| {
            warn!(file_name = %file_name, error = %e, "unreadable upload");
            (StatusCode::UNPROCESSABLE_ENTITY, format!("Error reading file: {}", e))
        })?;

    let row = repo::insert_uploaded_file(&state.db, &ctx.username, &file_name, &text)
        .await
        .map_err(internal)?;
    info!(id = row.id, file_name = %row.file_name, bytes = bytes.len(), "document uploaded");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            id: row.id,
            file_name: row.file_name,
            word_count: word_count(&row.file_content),
            uploaded_at: row.uploaded_at,
        }),
    ))
}

#[instrument(skip(state, ctx), fields(username = %ctx.username))]
pub async fn list_documents(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<UploadedFileListItem>>, (StatusCode, String)> {
    let (limit, offset) = p.bounds();
    let rows = repo::list_uploaded_files(&state.db, &ctx.username, limit, offset)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, ctx), fields(username = %ctx.username))]
pub async fn get_document(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<UploadedFile>, (StatusCode, String)> {
    repo::get_uploaded_file(&state.db, &ctx.username, id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Document not found".into()))
}
