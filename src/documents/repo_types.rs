use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UploadedFile {
    pub id: i64,
    pub username: String,
    pub file_name: String,
    pub file_content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

/// Listing row without the document body.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UploadedFileListItem {
    pub id: i64,
    pub file_name: String,
    pub chars: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum TaskType {
    Summary,
    Paraphrase,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProcessedText {
    pub id: i64,
    pub username: String,
    pub task_type: TaskType,
    pub original_text: String,
    pub processed_text: String,
    pub model: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewProcessedText<'a> {
    pub username: &'a str,
    pub task_type: TaskType,
    pub original_text: &'a str,
    pub processed_text: &'a str,
    pub model: &'a str,
}
