//! Auth handlers: register, login, session, logout.
//!
//! Each handler takes the request's cookie jar and, where the session
//! changes, returns the updated jar so Axum writes the `Set-Cookie` header.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{LoginResponse, MessageResponse, SessionResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.session_manager.register(req.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /auth/login
///
/// An unreadable body is treated as a login without credentials, so it
/// fails with the same 401 as every other rejected login.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_else(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Unreadable login body");
        LoginRequest::default()
    });

    let (jar, user) = state.session_manager.login(jar, req.into()).await?;

    Ok((
        jar,
        Json(LoginResponse {
            user: UserResponse::from(&user),
            message: "Login successful".to_string(),
        }),
    ))
}

/// GET /auth/session
pub async fn session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<SessionResponse>, ApiError> {
    let resolved = state.session_manager.resolve(&jar).await?;

    Ok(Json(SessionResponse {
        authenticated: resolved.is_some(),
        user: resolved.map(|session| UserResponse::from(&session.user)),
    }))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = state.session_manager.logout(jar);

    (
        jar,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}
