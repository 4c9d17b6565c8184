use axum::{Json, extract::State};

use crate::{AppState, auth::AdminUser, error::AppResult, models::DashboardStats};

/// dashboard_stats
///
/// [Admin Route] Headline counters for the admin dashboard.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Counters", body = DashboardStats),
        (status = 403, description = "Not an admin")
    ),
    tag = "admin"
)]
pub async fn dashboard_stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<DashboardStats>> {
    Ok(Json(state.repo.dashboard_stats().await?))
}
