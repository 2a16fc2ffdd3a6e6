//! Authentication HTTP handlers

use axum::{extract::State, http::StatusCode, Form, Json};
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::{LoginForm, RegisterRequest, TokenResponse, UserResponse};
use crate::state::AppState;

/// POST /api/auth/register - Create a new account
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    req.validate()?;

    let user = state
        .credential_service
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/auth/login - Exchange credentials for a bearer token
///
/// Form-encoded body, OAuth2 password-grant style.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let access_token = state
        .credential_service
        .login(&form.username, &form.password)
        .await?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /api/auth/me - Get the authenticated caller
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}
