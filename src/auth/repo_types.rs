use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database. The photo blob is loaded separately.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 PHC string
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub has_photo: bool,
    pub created_at: OffsetDateTime,
}

/// Everything needed to insert a user; the password is already hashed.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub photo: Option<Vec<u8>>,
}

/// Partial profile update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub photo: Option<Vec<u8>>,
}
