use axum::{
    Json,
    extract::State,
};

use crate::{
    AppState,
    auth::AdminUser,
    error::{AppJson, AppPath, AppResult},
    models::{MessageResponse, SiteSetting, UpsertSettingRequest, settings::require_setting_key},
};

#[utoipa::path(
    get,
    path = "/api/settings",
    responses((status = 200, description = "All settings, key ascending", body = [SiteSetting])),
    tag = "settings"
)]
pub async fn list_settings(State(state): State<AppState>) -> AppResult<Json<Vec<SiteSetting>>> {
    Ok(Json(state.repo.list_settings().await?))
}

#[utoipa::path(
    get,
    path = "/api/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "Found", body = SiteSetting),
        (status = 404, description = "Not found")
    ),
    tag = "settings"
)]
pub async fn get_setting(
    State(state): State<AppState>,
    AppPath(key): AppPath<String>,
) -> AppResult<Json<SiteSetting>> {
    Ok(Json(state.repo.get_setting(&key).await?))
}

/// upsert_setting
///
/// [Admin Route] Creates the key or overwrites its value. The value must parse as the
/// setting's type.
#[utoipa::path(
    put,
    path = "/api/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    request_body = UpsertSettingRequest,
    responses(
        (status = 200, description = "Stored", body = SiteSetting),
        (status = 400, description = "Invalid key or value")
    ),
    tag = "settings"
)]
pub async fn upsert_setting(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    AppPath(key): AppPath<String>,
    AppJson(payload): AppJson<UpsertSettingRequest>,
) -> AppResult<Json<SiteSetting>> {
    require_setting_key(&key)?;
    let setting = state.repo.upsert_setting(&key, payload).await?;
    tracing::info!(admin_id = %admin.id, key = %setting.key, "setting stored");
    Ok(Json(setting))
}

#[utoipa::path(
    delete,
    path = "/api/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found")
    ),
    tag = "settings"
)]
pub async fn delete_setting(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(key): AppPath<String>,
) -> AppResult<Json<MessageResponse>> {
    state.repo.delete_setting(&key).await?;
    Ok(Json(MessageResponse::new("Setting deleted successfully")))
}
