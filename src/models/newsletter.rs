use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::require_email;
use crate::error::AppResult;

/// Subscriber
///
/// One row per email ever subscribed. Unsubscribing flips `active` rather than deleting,
/// so a later subscribe reactivates the same row.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NewsletterRequest {
    pub email: String,
}

impl NewsletterRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_email(&self.email)
    }
}

/// Result of a subscribe call; each transition renders its own message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    Created,
    AlreadyActive,
    Reactivated,
}

impl Subscription {
    pub fn message(self) -> &'static str {
        match self {
            Subscription::Created => "Thank you for subscribing to our newsletter!",
            Subscription::AlreadyActive => "You're already subscribed to our newsletter!",
            Subscription::Reactivated => "Welcome back! Your subscription has been reactivated.",
        }
    }
}

/// Result of an unsubscribe call on a known email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsubscription {
    Deactivated,
    AlreadyInactive,
}

impl Unsubscription {
    pub fn message(self) -> &'static str {
        match self {
            Unsubscription::Deactivated => "You have been unsubscribed from our newsletter.",
            Unsubscription::AlreadyInactive => "This email is already unsubscribed.",
        }
    }
}
