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
    models::{
        Contact, ContactFilter, ContactStatus, CreateContactRequest, MessageResponse, Page,
        Pagination, UpdateContactStatusRequest,
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ContactListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    /// UNREAD, READ, REPLIED or ARCHIVED, any letter case.
    pub status: Option<String>,
    pub search: Option<String>,
}

/// submit_contact
///
/// [Public Route] Contact form. Every submission starts out UNREAD.
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = CreateContactRequest,
    responses(
        (status = 200, description = "Received", body = MessageResponse),
        (status = 400, description = "Invalid input")
    ),
    tag = "contact"
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateContactRequest>,
) -> AppResult<Json<MessageResponse>> {
    payload.validate()?;
    let contact = state.repo.create_contact(payload).await?;
    tracing::info!(contact_id = %contact.id, "contact message received");
    Ok(Json(MessageResponse::new(
        "Thank you for your message! We'll get back to you soon.",
    )))
}

#[utoipa::path(
    get,
    path = "/api/contact",
    params(ContactListParams),
    responses(
        (status = 200, description = "One page of messages, newest first", body = Page<Contact>),
        (status = 400, description = "Invalid status or pagination")
    ),
    tag = "contact"
)]
pub async fn list_contacts(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ContactListParams>,
) -> AppResult<Json<Page<Contact>>> {
    let page = Pagination::new(params.skip, params.limit)?;
    let status = match params.status.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(ContactStatus::parse(raw)?),
        None => None,
    };
    let filter = ContactFilter {
        status,
        search: params.search.filter(|s| !s.trim().is_empty()),
    };

    let (items, total) = state.repo.list_contacts(&filter, page).await?;
    Ok(Json(page.wrap(items, total)))
}

#[utoipa::path(
    get,
    path = "/api/contact/{id}",
    params(("id" = Uuid, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Found", body = Contact),
        (status = 404, description = "Not found")
    ),
    tag = "contact"
)]
pub async fn get_contact(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Contact>> {
    Ok(Json(state.repo.get_contact(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/contact/{id}/status",
    params(("id" = Uuid, Path, description = "Contact id")),
    request_body = UpdateContactStatusRequest,
    responses(
        (status = 200, description = "Updated", body = Contact),
        (status = 400, description = "Invalid status value"),
        (status = 404, description = "Not found")
    ),
    tag = "contact"
)]
pub async fn update_contact_status(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateContactStatusRequest>,
) -> AppResult<Json<Contact>> {
    let status = ContactStatus::parse(&payload.status)?;
    Ok(Json(state.repo.set_contact_status(id, status).await?))
}

#[utoipa::path(
    delete,
    path = "/api/contact/{id}",
    params(("id" = Uuid, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found")
    ),
    tag = "contact"
)]
pub async fn delete_contact(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.repo.delete_contact(id).await?;
    Ok(Json(MessageResponse::new("Contact deleted successfully")))
}
