use axum::Json;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{StatusCode, request::Parts};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use serde_json::json;

use crate::config::CONFIG;
use crate::service::Session;

pub const SESSION_COOKIE: &str = "vaxtrack_session";

/// Extractor that requires a valid session cookie.
/// The cookie is private (encrypted), so a decodable `Session` payload is
/// proof it was minted by this server.
#[derive(Debug, Clone)]
pub struct RequireSession(pub Session);

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| rejection.into_response())?;

        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Err(unauthorized());
        };
        let Ok(session) = serde_json::from_str::<Session>(cookie.value()) else {
            return Err(unauthorized());
        };
        Ok(Self(session))
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "unauthorized", "reason": "login required"})),
    )
        .into_response()
}

/// Build the session cookie for a freshly verified login.
pub fn session_cookie(session: &Session) -> Result<Cookie<'static>, serde_json::Error> {
    let value = serde_json::to_string(session)?;
    Ok(Cookie::build(Cookie::new(SESSION_COOKIE.to_string(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(CONFIG.session_ttl_minutes))
        .build())
}

/// An expired, empty cookie used to clear the session on logout.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
