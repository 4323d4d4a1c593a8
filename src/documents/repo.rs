use anyhow::Context;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::repo_types::{NewProcessedText, ProcessedText, TaskType, UploadedFile, UploadedFileListItem};

// ---- uploaded_files ----

pub async fn insert_uploaded_file(
    db: &SqlitePool,
    username: &str,
    file_name: &str,
    file_content: &str,
) -> anyhow::Result<UploadedFile> {
    let row = sqlx::query_as::<_, UploadedFile>(
        r#"
        INSERT INTO uploaded_files (username, file_name, file_content, uploaded_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, username, file_name, file_content, uploaded_at
        "#,
    )
    .bind(username)
    .bind(file_name)
    .bind(file_content)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await
    .context("insert uploaded file")?;
    Ok(row)
}

pub async fn list_uploaded_files(
    db: &SqlitePool,
    username: &str,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<UploadedFileListItem>> {
    let rows = sqlx::query_as::<_, UploadedFileListItem>(
        r#"
        SELECT id, file_name, length(file_content) AS chars, uploaded_at
          FROM uploaded_files
         WHERE username = ?1
         ORDER BY id DESC
         LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(username)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list uploaded files")?;
    Ok(rows)
}

/// A user's own upload; `None` for another user's id.
pub async fn get_uploaded_file(db: &SqlitePool, username: &str, id: i64) -> anyhow::Result<Option<UploadedFile>> {
    let row = sqlx::query_as::<_, UploadedFile>(
        r#"
        SELECT id, username, file_name, file_content, uploaded_at
          FROM uploaded_files
         WHERE id = ?1 AND username = ?2
        "#,
    )
    .bind(id)
    .bind(username)
    .fetch_optional(db)
    .await
    .context("get uploaded file")?;
    Ok(row)
}

// ---- processed_text ----

pub async fn insert_processed_text(db: &SqlitePool, new: &NewProcessedText<'_>) -> anyhow::Result<ProcessedText> {
    let row = sqlx::query_as::<_, ProcessedText>(
        r#"
        INSERT INTO processed_text (username, task_type, original_text, processed_text, model, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING id, username, task_type, original_text, processed_text, model, created_at
        "#,
    )
    .bind(new.username)
    .bind(new.task_type)
    .bind(new.original_text)
    .bind(new.processed_text)
    .bind(new.model)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await
    .context("insert processed text")?;
    Ok(row)
}

pub async fn list_processed_texts(
    db: &SqlitePool,
    username: &str,
    task_type: Option<TaskType>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<ProcessedText>> {
    let rows = sqlx::query_as::<_, ProcessedText>(
        r#"
        SELECT id, username, task_type, original_text, processed_text, model, created_at
          FROM processed_text
         WHERE username = ?1 AND (?2 IS NULL OR task_type = ?2)
         ORDER BY id DESC
         LIMIT ?3 OFFSET ?4
        "#,
    )
    .bind(username)
    .bind(task_type)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list processed texts")?;
    Ok(rows)
}
