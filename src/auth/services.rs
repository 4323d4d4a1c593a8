use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::{
    password::{hash_password, verify_password},
    repo_types::{NewUser, User},
};

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error("Username or Email already registered")]
    Duplicate,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Registration input after it has left the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub photo: Option<Vec<u8>>,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub async fn register(db: &SqlitePool, reg: Registration) -> Result<User, RegisterError> {
    let username = reg.username.trim().to_string();
    let email = reg.email.trim().to_lowercase();

    if username.is_empty() || email.is_empty() || reg.password.is_empty() {
        return Err(RegisterError::Invalid("Username, Email, and Password are required"));
    }
    if username.contains('@') {
        return Err(RegisterError::Invalid("Username must not contain '@'"));
    }
    if !is_valid_email(&email) {
        return Err(RegisterError::Invalid("Invalid email"));
    }
    if reg.password != reg.confirm_password {
        return Err(RegisterError::Invalid("Passwords do not match"));
    }
    if matches!(reg.age, Some(age) if !(10..=100).contains(&age)) {
        return Err(RegisterError::Invalid("Age must be between 10 and 100"));
    }

    let new = NewUser {
        username,
        email,
        password_hash: hash_password(&reg.password)?,
        name: reg.name,
        age: reg.age,
        gender: reg.gender,
        language: reg.language,
        photo: reg.photo,
    };

    match User::create(db, &new).await {
        Ok(user) => {
            info!(username = %user.username, "user registered");
            Ok(user)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!(username = %new.username, "username or email already registered");
            Err(RegisterError::Duplicate)
        }
        Err(e) => Err(RegisterError::Internal(anyhow::Error::new(e).context("create user"))),
    }
}

/// The user behind `identifier` if `password` matches its stored hash.
pub async fn authenticate(db: &SqlitePool, identifier: &str, password: &str) -> anyhow::Result<Option<User>> {
    let Some(user) = User::find_by_identifier(db, identifier.trim()).await? else {
        warn!(identifier = %identifier, "login unknown identifier");
        return Ok(None);
    };
    if verify_password(password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        warn!(username = %user.username, "login invalid password");
        Ok(None)
    }
}

pub async fn account_exists(db: &SqlitePool, identifier: &str) -> anyhow::Result<bool> {
    Ok(User::find_by_identifier(db, identifier.trim()).await?.is_some())
}

/// Rehashes and overwrites the password of the one account behind
/// `identifier`; `false` when there is no such account.
pub async fn reset_password(db: &SqlitePool, identifier: &str, new_password: &str) -> anyhow::Result<bool> {
    let Some(user) = User::find_by_identifier(db, identifier.trim()).await? else {
        return Ok(false);
    };
    let hash = hash_password(new_password)?;
    let updated = User::update_password(db, user.id, &hash).await?;
    if updated > 0 {
        info!(username = %user.username, "password reset");
    }
    Ok(updated > 0)
}
