use crate::auth::repo_types::{NewUser, ProfileUpdate, User};
use anyhow::Context;
use sqlx::SqlitePool;
use time::OffsetDateTime;

const USER_COLUMNS: &str = r#"
    id, username, email, password_hash, name, age, gender, language,
    photo IS NOT NULL AS has_photo, created_at
"#;

impl User {
    /// An identifier containing `@` is an email (case-insensitive), anything
    /// else a username. Usernames never contain `@`, so at most one row matches.
    pub async fn find_by_identifier(db: &SqlitePool, identifier: &str) -> anyhow::Result<Option<User>> {
        if identifier.contains('@') {
            Self::find_by_email(db, identifier).await
        } else {
            Self::find_by_username(db, identifier).await
        }
    }

    pub async fn find_by_email(db: &SqlitePool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ?1",
            USER_COLUMNS
        ))
        .bind(email.to_lowercase())
        .fetch_optional(db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    pub async fn find_by_username(db: &SqlitePool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = ?1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(db)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    /// Insert a user. Unique violations on username or email surface as the
    /// raw `sqlx::Error` so callers can tell duplicates apart.
    pub async fn create(db: &SqlitePool, new: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, name, age, gender, language, photo, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.name)
        .bind(new.age)
        .bind(&new.gender)
        .bind(&new.language)
        .bind(&new.photo)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }

    /// Returns the number of rows updated, 0 or 1.
    pub async fn update_password(db: &SqlitePool, user_id: i64, password_hash: &str) -> anyhow::Result<u64> {
        let res = sqlx::query("UPDATE users SET password_hash = ?1 WHERE id = ?2")
            .bind(password_hash)
            .bind(user_id)
            .execute(db)
            .await
            .context("update password")?;
        Ok(res.rows_affected())
    }

    pub async fn update_profile(db: &SqlitePool, username: &str, update: &ProfileUpdate) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                name     = COALESCE(?1, name),
                age      = COALESCE(?2, age),
                gender   = COALESCE(?3, gender),
                language = COALESCE(?4, language),
                photo    = COALESCE(?5, photo)
            WHERE username = ?6
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&update.name)
        .bind(update.age)
        .bind(&update.gender)
        .bind(&update.language)
        .bind(&update.photo)
        .bind(username)
        .fetch_optional(db)
        .await
        .context("update profile")?;
        Ok(user)
    }

    pub async fn photo(db: &SqlitePool, username: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let row: Option<(Option<Vec<u8>>,)> = sqlx::query_as("SELECT photo FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(db)
            .await
            .context("load photo")?;
        Ok(row.and_then(|(p,)| p))
    }
}
