use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::middleware::session::{clear_session_cookie, session_cookie};
use crate::{VaxError, router::VaxState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/register -> creates the account; the caller logs in after.
pub async fn register(
    State(state): State<VaxState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, VaxError> {
    state
        .auth
        .register(&req.username, &req.password, &req.confirm_password)
        .await?;
    info!(username = %req.username, "account created");
    Ok((
        StatusCode::CREATED,
        Json(json!({"username": req.username})),
    ))
}

/// POST /auth/login -> verifies credentials and sets the session cookie.
pub async fn login(
    State(state): State<VaxState>,
    jar: PrivateCookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, VaxError> {
    let session = state.auth.login(&req.username, &req.password).await?;
    let jar = jar.add(session_cookie(&session)?);
    info!(username = %session.username, "login succeeded");
    Ok((jar, Json(session)))
}

/// POST /auth/logout -> clears the session cookie. Always succeeds.
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    let jar = jar.remove(clear_session_cookie());
    (jar, Json(json!({"logged_out": true})))
}
