use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, MessageResponse, PublicUser, RecoverRequest,
            RegisterRequest, ResetPasswordRequest, UpdateProfileRequest,
        },
        extractors::RequestContext,
        jwt::TokenKeys,
        repo_types::{ProfileUpdate, User},
        services::{self, RegisterError, Registration},
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/recover", post(recover))
        .route("/auth/reset-password", post(reset_password))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/profile", put(update_profile))
        .route("/me/photo", get(get_photo))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn signed_response(state: &AppState, user: User, remember: bool) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let keys = TokenKeys::from_ref(state);
    let (token, claims) = keys.issue(&user.username, remember).map_err(internal)?;
    Ok(Json(AuthResponse {
        token,
        expires_at: claims.exp,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    let reg = Registration {
        username: payload.username,
        email: payload.email,
        password: payload.password,
        confirm_password: payload.confirm_password,
        name: payload.name,
        age: payload.age,
        gender: payload.gender,
        language: payload.language,
        photo: payload.photo.map(|b| b.into_vec()),
    };

    let user = match services::register(&state.db, reg).await {
        Ok(u) => u,
        Err(RegisterError::Invalid(msg)) => {
            warn!(reason = msg, "registration rejected");
            return Err((StatusCode::BAD_REQUEST, msg.into()));
        }
        Err(e @ RegisterError::Duplicate) => return Err((StatusCode::CONFLICT, e.to_string())),
        Err(RegisterError::Internal(e)) => return Err(internal(e)),
    };

    // new accounts start logged in with a normal session
    let body = signed_response(&state, user, false)?;
    Ok((StatusCode::CREATED, body))
}

#[instrument(skip(state, payload), fields(identifier = %payload.identifier, remember = payload.remember))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let user = services::authenticate(&state.db, &payload.identifier, &payload.password)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()))?;

    info!(username = %user.username, "user logged in");
    signed_response(&state, user, payload.remember)
}

#[instrument(skip(state, payload))]
pub async fn recover(
    State(state): State<AppState>,
    Json(payload): Json<RecoverRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    if services::account_exists(&state.db, &payload.identifier)
        .await
        .map_err(internal)?
    {
        Ok(Json(MessageResponse {
            message: "User found. Please set a new password.".into(),
        }))
    } else {
        Err((StatusCode::NOT_FOUND, "Email/Username not found".into()))
    }
}

#[instrument(skip(state, payload), fields(identifier = %payload.identifier))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    if payload.new_password.is_empty() || payload.new_password != payload.confirm_password {
        warn!("password reset rejected");
        return Err((StatusCode::BAD_REQUEST, "Passwords do not match or are empty".into()));
    }

    let updated = services::reset_password(&state.db, &payload.identifier, &payload.new_password)
        .await
        .map_err(internal)?;
    if !updated {
        return Err((StatusCode::NOT_FOUND, "Email/Username not found".into()));
    }
    Ok(Json(MessageResponse {
        message: "Password updated successfully. Please login again.".into(),
    }))
}

#[instrument(skip(state, ctx), fields(username = %ctx.username))]
pub async fn get_me(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = User::find_by_username(&state.db, &ctx.username)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            warn!("user from token not found");
            (StatusCode::UNAUTHORIZED, "User not found".to_string())
        })?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, ctx, payload), fields(username = %ctx.username))]
pub async fn update_profile(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    if matches!(payload.age, Some(age) if !(10..=100).contains(&age)) {
        return Err((StatusCode::BAD_REQUEST, "Age must be between 10 and 100".into()));
    }
    let update = ProfileUpdate {
        name: payload.name,
        age: payload.age,
        gender: payload.gender,
        language: payload.language,
        photo: payload.photo.map(|b| b.into_vec()),
    };
    let user = User::update_profile(&state.db, &ctx.username, &update)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;
    info!("profile updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state, ctx), fields(username = %ctx.username))]
pub async fn get_photo(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let photo = User::photo(&state.db, &ctx.username)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "No profile photo".to_string()))?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], photo))
}
