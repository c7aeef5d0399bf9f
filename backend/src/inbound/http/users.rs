//! Account API handlers.
//!
//! ```text
//! GET   /api/users/me
//! PATCH /api/users/avatar {"avatarUrl":"https://cdn.example.com/ada.png"}
//! ```

use actix_web::{get, patch, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AvatarUrl, UserAccount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, user_error};

/// Account profile returned to its owner.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Account identifier; also the owner key for contacts.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Login handle.
    #[schema(example = "ada_l")]
    pub username: String,
    /// Account email address.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Gravatar default unless replaced.
    #[schema(example = "https://www.gravatar.com/avatar/0bc8?d=identicon")]
    pub avatar_url: Option<String>,
    /// Whether the email address has been confirmed.
    pub confirmed: bool,
    /// Registration time.
    #[schema(value_type = String, example = "2024-01-01T00:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<UserAccount> for UserResponse {
    fn from(value: UserAccount) -> Self {
        Self {
            id: value.id.to_string(),
            username: value.username.into(),
            email: value.email.into(),
            avatar_url: value.avatar.map(String::from),
            confirmed: value.confirmed,
            created_at: value.created_at,
        }
    }
}

/// Request body for `PATCH /api/users/avatar`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvatarRequest {
    /// Absolute `http` or `https` URL.
    #[schema(example = "https://cdn.example.com/ada.png")]
    pub avatar_url: String,
}

/// Return the authenticated account.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(user: CurrentUser) -> ApiResult<web::Json<UserResponse>> {
    Ok(web::Json(user.into_account().into()))
}

/// Replace the authenticated account's avatar.
#[utoipa::path(
    patch,
    path = "/api/users/avatar",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Invalid avatar URL", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateAvatar"
)]
#[patch("/users/avatar")]
pub async fn update_avatar(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<AvatarRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let avatar = AvatarUrl::new(payload.into_inner().avatar_url)
        .map_err(|err| user_error(FieldName::new("avatarUrl"), err))?;
    let account = state
        .accounts
        .update_avatar(&user.account().email, avatar)
        .await?;
    Ok(web::Json(account.into()))
}

/// Register the account routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(current_user).service(update_avatar);
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
