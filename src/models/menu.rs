use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{require_opt_text, require_text};
use crate::error::AppResult;

/// MenuItem
///
/// Row of `menu_items`. `parent_id` is self-referential and the relation permits any
/// depth, but the menu endpoints only ever materialize parents and their direct children.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct MenuItem {
    pub id: Uuid,
    pub title: String,
    pub path: Option<String>,
    pub new_tab: bool,
    #[sqlx(rename = "display_order")]
    pub order: i32,
    pub published: bool,
    pub parent_id: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// MenuNode
///
/// A top-level item with its direct children. Children are plain items: grandchildren
/// are never attached.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct MenuNode {
    pub id: Uuid,
    pub title: String,
    pub path: Option<String>,
    pub new_tab: bool,
    pub order: i32,
    pub published: bool,
    pub parent_id: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
    pub children: Vec<MenuItem>,
}

impl MenuNode {
    pub fn new(item: MenuItem, children: Vec<MenuItem>) -> Self {
        Self {
            id: item.id,
            title: item.title,
            path: item.path,
            new_tab: item.new_tab,
            order: item.order,
            published: item.published,
            parent_id: item.parent_id,
            created_at: item.created_at,
            updated_at: item.updated_at,
            children,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateMenuItemRequest {
    pub title: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub new_tab: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub published: bool,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

impl CreateMenuItemRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_text("title", &self.title)
    }
}

/// UpdateMenuItemRequest
///
/// Partial update. Moving an item back to the top level is done through reorder, which
/// sets `parent_id` explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateMenuItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_tab: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
}

impl UpdateMenuItemRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_opt_text("title", self.title.as_deref())
    }
}

/// ReorderEntry
///
/// One element of a reorder batch. `parent_id: null` (or absent) moves the item to the
/// top level.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ReorderEntry {
    pub id: Uuid,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum BulkAction {
    Publish,
    Unpublish,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct BulkActionRequest {
    pub item_ids: Vec<Uuid>,
    pub action: BulkAction,
}
