use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use redis::AsyncCommands;
use time::Duration;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserSummary;
use crate::state::AppState;

/// Cookie carrying the opaque session id.
pub const SESSION_COOKIE: &str = "interviewmate_sid";

/// Sessions live for 7 days, in Redis and on the cookie alike.
pub const SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

fn session_key(id: &str) -> String {
    format!("session:{id}")
}

/// Creates a session record in Redis and returns the cookie to set.
pub async fn establish(state: &AppState, user: &UserSummary) -> Result<Cookie<'static>, AppError> {
    let session_id = Uuid::new_v4().to_string();
    let payload = serde_json::to_string(user)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("session serialization failed: {e}")))?;

    let mut conn = state.redis.clone();
    let _: () = conn
        .set_ex(session_key(&session_id), payload, SESSION_TTL_SECS)
        .await?;

    Ok(session_cookie(
        session_id,
        Duration::seconds(SESSION_TTL_SECS as i64),
    ))
}

/// Looks up the session record for the id carried by the cookie jar.
/// `None` covers both "no cookie" and "expired/unknown session".
pub async fn resolve(state: &AppState, jar: &CookieJar) -> Result<Option<UserSummary>, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };

    let mut conn = state.redis.clone();
    let payload: Option<String> = conn.get(session_key(cookie.value())).await?;
    match payload {
        Some(json) => {
            let user = serde_json::from_str(&json).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("session record is malformed: {e}"))
            })?;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

/// Deletes the session record (if any) and returns an expired cookie.
/// Safe to call without an active session.
pub async fn destroy(state: &AppState, jar: &CookieJar) -> Result<Cookie<'static>, AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let mut conn = state.redis.clone();
        let _: () = conn.del(session_key(cookie.value())).await?;
    }
    Ok(session_cookie(String::new(), Duration::ZERO))
}

fn session_cookie(value: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// The authenticated user for this request, resolved from the session
/// cookie. Handlers take this as an argument instead of reading ambient
/// session state; extraction rejects with 401 when no live session exists.
pub struct CurrentUser(pub UserSummary);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        match resolve(state, &jar).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(AppError::Unauthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string(), Duration::seconds(SESSION_TTL_SECS as i64));
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn test_expired_cookie_clears_the_session() {
        let cookie = session_cookie(String::new(), Duration::ZERO);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
