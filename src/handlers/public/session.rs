use axum::response::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_session_token, Claims};
use crate::config;
use crate::database::models::user::ProfileUser;
use crate::database::UserRepository;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /auth/login - Authenticate credentials and establish a session
///
/// On success sets the session cookie (HTTP-only, SameSite=Lax) carrying a
/// signed token; the response body is the profile-shaped user object. Unknown
/// email and wrong password are indistinguishable to the caller.
pub async fn login(
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let repository = UserRepository::shared().await?;
    let user = repository
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    if !repository.verify_password(&user, &payload.password)? {
        tracing::warn!("Failed login attempt for {}", payload.email);
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let claims = Claims::new(user.id, user.email.clone(), user.name.clone(), user.role);
    let token = generate_session_token(&claims)?;

    let cookie_name = config::config().security.session_cookie.as_str();
    let cookie = Cookie::build((cookie_name, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    tracing::info!("Session established for {}", user.email);

    Ok((
        jar.add(cookie),
        Json(json!({ "user": ProfileUser::from(&user) })),
    ))
}

/// POST /auth/logout - Clear the session cookie
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let cookie_name = config::config().security.session_cookie.as_str();
    let removal = Cookie::build(cookie_name).path("/");

    (
        jar.remove(removal),
        Json(json!({ "message": "Logged out" })),
    )
}
