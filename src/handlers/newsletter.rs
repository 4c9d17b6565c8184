use axum::{
    Json,
    extract::State,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AdminUser,
    error::{AppJson, AppPath, AppQuery, AppResult},
    models::{MessageResponse, NewsletterRequest, Page, Pagination, Subscriber},
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SubscriberListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    /// Defaults to true.
    pub active_only: Option<bool>,
}

/// subscribe
///
/// [Public Route] Idempotent per email: a repeat subscribe never creates a second row,
/// and an unsubscribed email is reactivated in place.
#[utoipa::path(
    post,
    path = "/api/newsletter/subscribe",
    request_body = NewsletterRequest,
    responses(
        (status = 200, description = "Subscribed, already active or reactivated", body = MessageResponse),
        (status = 400, description = "Invalid email")
    ),
    tag = "newsletter"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewsletterRequest>,
) -> AppResult<Json<MessageResponse>> {
    payload.validate()?;
    let outcome = state.repo.subscribe(&payload.email).await?;
    tracing::debug!(?outcome, "newsletter subscribe");
    Ok(Json(MessageResponse::new(outcome.message())))
}

#[utoipa::path(
    post,
    path = "/api/newsletter/unsubscribe",
    request_body = NewsletterRequest,
    responses(
        (status = 200, description = "Unsubscribed or already inactive", body = MessageResponse),
        (status = 400, description = "Invalid email"),
        (status = 404, description = "Email was never subscribed")
    ),
    tag = "newsletter"
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewsletterRequest>,
) -> AppResult<Json<MessageResponse>> {
    payload.validate()?;
    let outcome = state.repo.unsubscribe(&payload.email).await?;
    tracing::debug!(?outcome, "newsletter unsubscribe");
    Ok(Json(MessageResponse::new(outcome.message())))
}

#[utoipa::path(
    get,
    path = "/api/newsletter/subscribers",
    params(SubscriberListParams),
    responses(
        (status = 200, description = "One page of subscribers, newest first", body = Page<Subscriber>),
        (status = 400, description = "Invalid pagination")
    ),
    tag = "newsletter"
)]
pub async fn list_subscribers(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SubscriberListParams>,
) -> AppResult<Json<Page<Subscriber>>> {
    let page = Pagination::new(params.skip, params.limit)?;
    let active_only = params.active_only.unwrap_or(true);
    let (items, total) = state.repo.list_subscribers(active_only, page).await?;
    Ok(Json(page.wrap(items, total)))
}

/// delete_subscriber
///
/// [Admin Route] Hard delete, unlike unsubscribe.
#[utoipa::path(
    delete,
    path = "/api/newsletter/subscribers/{id}",
    params(("id" = Uuid, Path, description = "Subscriber id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found")
    ),
    tag = "newsletter"
)]
pub async fn delete_subscriber(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.repo.delete_subscriber(id).await?;
    Ok(Json(MessageResponse::new("Subscriber deleted successfully")))
}
