use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{require_email, require_text};
use crate::error::{AppError, AppResult};

/// ContactStatus
///
/// Triage state of a contact-form submission. Stored as the Postgres enum `contact_status`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "contact_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum ContactStatus {
    #[default]
    Unread,
    Read,
    Replied,
    Archived,
}

impl ContactStatus {
    /// Case-insensitive parse of a status name, as accepted by query strings and bodies.
    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "UNREAD" => Ok(ContactStatus::Unread),
            "READ" => Ok(ContactStatus::Read),
            "REPLIED" => Ok(ContactStatus::Replied),
            "ARCHIVED" => Ok(ContactStatus::Archived),
            _ => Err(AppError::validation("Invalid status value")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// CreateContactRequest
///
/// Public contact-form submission (POST /api/contact).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

impl CreateContactRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_text("name", &self.name)?;
        require_email(&self.email)?;
        require_text("message", &self.message)
    }
}

/// UpdateContactStatusRequest
///
/// `status` is accepted in any letter case.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateContactStatusRequest {
    pub status: String,
}

/// ContactFilter
///
/// `search` matches name, email, subject and message case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
    pub search: Option<String>,
}
