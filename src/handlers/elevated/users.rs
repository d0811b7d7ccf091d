// handlers/elevated/users.rs - Admin user directory: list/create/update
use axum::{extract::Extension, response::Json};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::database::models::user::{NewUser, Role, SanitizedUser, UserRecord};
use crate::database::UserRepository;
use crate::error::ApiError;
use crate::middleware::SessionUser;

/// Admin gate, applied inside every directory operation before any
/// persistence access. Exhaustive on purpose.
fn require_admin(session: &SessionUser) -> Result<(), ApiError> {
    match session.role {
        Role::Admin => Ok(()),
        Role::Agent | Role::User => Err(ApiError::forbidden("Forbidden")),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub number: Option<String>,
    pub extension_id: Option<String>,
    pub host: Option<String>,
    pub port: Option<i32>,
    pub secret: Option<String>,
}

/// Partial-update body. The optional telephony/name fields distinguish
/// "absent" (outer None, leave unchanged) from an explicit JSON null
/// (Some(None), clear the column). Email and password instead treat null and
/// "" like absence: an account always keeps an email and a credential.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: Option<Uuid>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "double_option")]
    pub number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub extension_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub host: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub port: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub secret: Option<Option<String>>,
}

/// Distinguishes a field absent from the body (outer None) from an explicit
/// JSON null (Some(None)).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// GET /api/admin/users - All accounts, most recently created first
pub async fn users_list(
    Extension(session): Extension<SessionUser>,
) -> Result<Json<Vec<SanitizedUser>>, ApiError> {
    require_admin(&session)?;

    let repository = UserRepository::shared().await?;
    let users = repository.list().await?;

    Ok(Json(users.iter().map(SanitizedUser::from).collect()))
}

/// POST /api/admin/users - Create an account
///
/// Email and password are required; role defaults to `user`. A duplicate
/// email fails before any insertion.
pub async fn users_create(
    Extension(session): Extension<SessionUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<SanitizedUser>, ApiError> {
    require_admin(&session)?;

    let email = non_empty(payload.email.as_deref())
        .ok_or_else(|| ApiError::bad_request("Email and password are required"))?
        .to_string();
    let password = non_empty(payload.password.as_deref())
        .ok_or_else(|| ApiError::bad_request("Email and password are required"))?
        .to_string();

    let repository = UserRepository::shared().await?;

    if repository.find_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request("User with this email already exists"));
    }

    let user = repository
        .create(NewUser {
            email,
            password,
            name: payload.name,
            role: payload.role.unwrap_or_default(),
            number: payload.number,
            extension_id: payload.extension_id,
            host: payload.host,
            port: payload.port,
            secret: payload.secret,
        })
        .await?;

    tracing::info!("Account {} created by {}", user.email, session.email);

    Ok(Json(SanitizedUser::from(&user)))
}

/// PUT /api/admin/users - Partial update of an account
///
/// Only fields present in the body change. A present email is checked for
/// uniqueness against all other accounts before anything is written, so a
/// conflict mutates nothing. A present, non-empty password replaces the
/// stored credential; role absent means "leave unchanged" (unlike create,
/// which defaults a missing role - preserved asymmetry).
pub async fn users_update(
    Extension(session): Extension<SessionUser>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<SanitizedUser>, ApiError> {
    require_admin(&session)?;

    let id = payload
        .id
        .ok_or_else(|| ApiError::bad_request("User id is required"))?;

    let repository = UserRepository::shared().await?;

    let mut user = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if let Some(email) = non_empty(payload.email.as_deref()) {
        if repository.email_in_use_by_other(email, id).await? {
            return Err(ApiError::bad_request("Email already in use"));
        }
    }

    apply_update(&mut user, &payload);

    let new_password = non_empty(payload.password.as_deref());
    let updated = repository.update(&user, new_password).await?;

    tracing::info!("Account {} updated by {}", updated.email, session.email);

    Ok(Json(SanitizedUser::from(&updated)))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Field-by-field partial update. Absent fields keep their stored values;
/// a present field is applied as-is, so an explicit empty string or null
/// overwrites/clears a textual field.
fn apply_update(user: &mut UserRecord, payload: &UpdateUserRequest) {
    if let Some(email) = non_empty(payload.email.as_deref()) {
        user.email = email.to_string();
    }
    if let Some(name) = &payload.name {
        user.name = name.clone();
    }
    if let Some(role) = payload.role {
        user.role = role;
    }
    if let Some(number) = &payload.number {
        user.number = number.clone();
    }
    if let Some(extension_id) = &payload.extension_id {
        user.extension_id = extension_id.clone();
    }
    if let Some(host) = &payload.host {
        user.host = host.clone();
    }
    if let Some(port) = payload.port {
        user.port = port;
    }
    if let Some(secret) = &payload.secret {
        user.secret = secret.clone();
    }
}
