use axum::{extract::Extension, response::Json};
use serde_json::{json, Value};

use crate::database::models::user::ProfileUser;
use crate::database::UserRepository;
use crate::error::ApiError;
use crate::middleware::SessionUser;

/// GET /api/user/profile - Current user's profile
///
/// The session middleware has already produced a 401 for unauthenticated
/// callers. 404 covers a session that references a since-deleted account.
pub async fn profile_get(
    Extension(session): Extension<SessionUser>,
) -> Result<Json<Value>, ApiError> {
    let repository = UserRepository::shared().await?;

    let user = repository
        .find_by_id(session.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(json!({ "user": ProfileUser::from(&user) })))
}
