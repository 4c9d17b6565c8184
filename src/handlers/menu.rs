use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AdminUser,
    error::{AppError, AppJson, AppPath, AppQuery, AppResult},
    models::{
        BulkAction, BulkActionRequest, CreateMenuItemRequest, MenuItem, MenuNode,
        MessageResponse, ReorderEntry, UpdateMenuItemRequest,
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AdminMenuParams {
    #[serde(default)]
    pub include_unpublished: bool,
}

/// public_menu
///
/// [Public Route] Published top-level items with their published direct children.
/// Deeper levels are never returned.
#[utoipa::path(
    get,
    path = "/api/navbar/menu",
    responses((status = 200, description = "Menu tree", body = [MenuNode])),
    tag = "navbar"
)]
pub async fn public_menu(State(state): State<AppState>) -> AppResult<Json<Vec<MenuNode>>> {
    Ok(Json(state.repo.menu_tree(false).await?))
}

#[utoipa::path(
    get,
    path = "/api/navbar/admin/menu",
    params(AdminMenuParams),
    responses((status = 200, description = "Menu tree", body = [MenuNode])),
    tag = "navbar"
)]
pub async fn admin_menu(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<AdminMenuParams>,
) -> AppResult<Json<Vec<MenuNode>>> {
    Ok(Json(state.repo.menu_tree(params.include_unpublished).await?))
}

#[utoipa::path(
    post,
    path = "/api/navbar/menu",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 201, description = "Created", body = MenuItem),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Parent not found")
    ),
    tag = "navbar"
)]
pub async fn create_menu_item(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateMenuItemRequest>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    payload.validate()?;
    Ok((
        StatusCode::CREATED,
        Json(state.repo.create_menu_item(payload).await?),
    ))
}

#[utoipa::path(
    put,
    path = "/api/navbar/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu item id")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Updated", body = MenuItem),
        (status = 400, description = "Invalid input or item set as its own parent"),
        (status = 404, description = "Item or parent not found")
    ),
    tag = "navbar"
)]
pub async fn update_menu_item(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateMenuItemRequest>,
) -> AppResult<Json<MenuItem>> {
    payload.validate()?;
    Ok(Json(state.repo.update_menu_item(id, payload).await?))
}

/// delete_menu_item
///
/// [Admin Route] Removes the item and everything nested under it.
#[utoipa::path(
    delete,
    path = "/api/navbar/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found")
    ),
    tag = "navbar"
)]
pub async fn delete_menu_item(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.repo.delete_menu_item(id).await?;
    Ok(Json(MessageResponse::new("Menu item deleted successfully")))
}

/// reorder_menu
///
/// [Admin Route] Applies every `{id, order, parent_id}` entry or none of them.
#[utoipa::path(
    post,
    path = "/api/navbar/admin/menu/reorder",
    request_body = [ReorderEntry],
    responses(
        (status = 200, description = "Reordered", body = MessageResponse),
        (status = 404, description = "Unknown item or parent; nothing changed")
    ),
    tag = "navbar"
)]
pub async fn reorder_menu(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    AppJson(entries): AppJson<Vec<ReorderEntry>>,
) -> AppResult<Json<MessageResponse>> {
    let count = entries.len();
    state.repo.reorder_menu(entries).await?;
    tracing::info!(admin_id = %admin.id, count, "menu reordered");
    Ok(Json(MessageResponse::new("Menu items reordered successfully")))
}

#[utoipa::path(
    post,
    path = "/api/navbar/admin/menu/bulk-action",
    request_body = BulkActionRequest,
    responses(
        (status = 200, description = "Applied", body = MessageResponse),
        (status = 400, description = "Empty id list")
    ),
    tag = "navbar"
)]
pub async fn bulk_menu_action(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<BulkActionRequest>,
) -> AppResult<Json<MessageResponse>> {
    if payload.item_ids.is_empty() {
        return Err(AppError::validation("item_ids must not be empty"));
    }
    let action = payload.action;
    let affected = state
        .repo
        .bulk_menu_action(payload.item_ids, action)
        .await?;

    tracing::info!(admin_id = %admin.id, ?action, affected, "menu bulk action");
    let verb = match action {
        BulkAction::Publish => "published",
        BulkAction::Unpublish => "unpublished",
        BulkAction::Delete => "deleted",
    };
    Ok(Json(MessageResponse::new(format!(
        "Successfully {verb} {affected} menu items"
    ))))
}
