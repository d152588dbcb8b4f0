use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::sessions::{self, CurrentUser};
use crate::auth::store;
use crate::errors::AppError;
use crate::models::user::UserSummary;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserSummary,
}

/// POST /user/register
pub async fn handle_register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let name = req.name.trim();
    let email = req.email.trim();
    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    // Uniqueness is a service-level check; the store carries no constraint.
    if store::find_by_email(&state.db, email).await?.is_some() {
        return Err(AppError::Conflict);
    }

    let password_hash = hash_password(&req.password)?;
    let user = store::insert(&state.db, name, email, &password_hash).await?;
    let summary = UserSummary::from(&user);

    let cookie = sessions::establish(&state, &summary).await?;
    info!("Registered user {} ({})", summary.id, summary.email);

    Ok((
        StatusCode::CREATED,
        jar.add(cookie),
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: summary,
        }),
    ))
}

/// POST /user/login
/// One error message covers both unknown email and wrong password.
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = store::find_by_email(&state.db, email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let summary = UserSummary::from(&user);
    let cookie = sessions::establish(&state, &summary).await?;
    info!("User {} logged in", summary.id);

    Ok((
        jar.add(cookie),
        Json(AuthResponse {
            message: "Login successful".to_string(),
            user: summary,
        }),
    ))
}

/// POST /user/logout
/// Idempotent: logging out without a session still succeeds.
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let expired = sessions::destroy(&state, &jar).await?;
    Ok((
        jar.add(expired),
        Json(json!({ "message": "Logged out successfully" })),
    ))
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: UserSummary,
}

/// GET /user/session
/// The extractor rejects with 401 when no live session exists.
pub async fn handle_session(CurrentUser(user): CurrentUser) -> Json<SessionResponse> {
    Json(SessionResponse { user })
}
