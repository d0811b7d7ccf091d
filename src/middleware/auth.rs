use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::auth::{verify_session_token, Claims};
use crate::config;
use crate::database::models::user::Role;
use crate::error::ApiError;

/// Authenticated session context extracted from the session token
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}

/// Session authentication middleware layered over the entire /api prefix.
/// Accepts the session cookie set at login, or an Authorization bearer token.
/// Role checks are not made here; handlers that need a specific role re-check
/// it themselves.
pub async fn session_auth_middleware(
    jar: CookieJar,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(&jar, &headers)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let claims = verify_session_token(&token)?;

    let session_user = SessionUser::from(claims);
    request.extensions_mut().insert(session_user);

    Ok(next.run(request).await)
}

/// Session token from the configured cookie, falling back to a bearer header.
fn extract_session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    let cookie_name = &config::config().security.session_cookie;
    if let Some(cookie) = jar.get(cookie_name) {
        let value = cookie.value();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    let auth_str = headers.get("authorization")?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_is_accepted_as_fallback() {
        let jar = CookieJar::new();
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));

        assert_eq!(
            extract_session_token(&jar, &headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn missing_and_malformed_tokens_are_rejected() {
        let jar = CookieJar::new();
        let mut headers = HeaderMap::new();
        assert_eq!(extract_session_token(&jar, &headers), None);

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_session_token(&jar, &headers), None);

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert_eq!(extract_session_token(&jar, &headers), None);
    }
}
