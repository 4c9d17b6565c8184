//! HTTP handlers, one module per resource.
//!
//! Handlers validate the request shape, call the repository and map the result to a
//! response. Access strength is declared by the extractor in each signature
//! (`OptionalUser`, `AuthUser`, `AdminUser`) and by the router the handler is mounted on.

pub mod admin;
pub mod auth;
pub mod blogs;
pub mod catalog;
pub mod contact;
pub mod menu;
pub mod newsletter;
pub mod settings;
pub mod users;

use axum::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::MessageResponse;

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
}

/// root
///
/// [Public Route] Liveness banner.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = MessageResponse)),
    tag = "system"
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("API is running"))
}

/// health
///
/// [Public Route] Used by monitoring and load balancer checks.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Healthy", body = HealthResponse)),
    tag = "system"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
