use axum::{
    Json,
    extract::State,
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::{AdminUser, AuthUser},
    error::{AppError, AppJson, AppPath, AppResult},
    models::{MessageResponse, UpdateUserRequest, User},
};

#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users, newest first", body = [User])),
    tag = "users"
)]
pub async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.repo.list_users().await?))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Found", body = User),
        (status = 404, description = "Not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<User>> {
    let record = state
        .repo
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(User::from(record)))
}

/// update_user
///
/// [Admin Route] Partial update of another account's name or email.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 400, description = "Invalid input or email already registered"),
        (status = 404, description = "Not found")
    ),
    tag = "users"
)]
pub async fn update_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    payload.validate()?;
    Ok(Json(state.repo.update_user(id, payload).await?))
}

/// delete_user
///
/// [Admin Route] Hard delete. The account's blogs go with it, along with their comments
/// and tag links. An admin cannot delete the account they are signed in with.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Self-delete"),
        (status = 404, description = "Not found")
    ),
    tag = "users"
)]
pub async fn delete_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    if admin.id == id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }
    state.repo.delete_user(id).await?;
    tracing::info!(admin_id = %admin.id, user_id = %id, "user deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// update_profile
///
/// [Authenticated Route] The caller edits their own name or email.
#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 400, description = "Invalid input or email already registered")
    ),
    tag = "users"
)]
pub async fn update_profile(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    payload.validate()?;
    Ok(Json(state.repo.update_user(id, payload).await?))
}
