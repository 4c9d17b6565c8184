use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{require_opt_text, require_text};
use crate::error::{AppError, AppResult};

// Catalog entities share one lifecycle: a natural key that must be unique, a display
// `order` (ties broken by creation time) and a `published` visibility flag. The SQL
// column for `order` is `display_order` since ORDER is reserved.

/// CatalogFilter
///
/// Visibility predicate for catalog listings. `featured_only` is only meaningful for
/// testimonials and ignored elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct CatalogFilter {
    pub published_only: bool,
    pub featured_only: bool,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            published_only: true,
            featured_only: false,
        }
    }
}

fn default_true() -> bool {
    true
}

// --- Features ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Feature {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[sqlx(rename = "display_order")]
    pub order: i32,
    pub published: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateFeatureRequest {
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub published: bool,
}

impl CreateFeatureRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)?;
        require_text("icon", &self.icon)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateFeatureRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl UpdateFeatureRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_opt_text("title", self.title.as_deref())
    }
}

// --- Testimonials ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Testimonial {
    pub id: Uuid,
    pub name: String,
    pub designation: String,
    pub company: Option<String>,
    pub image: String,
    pub content: String,
    pub rating: i32,
    pub featured: bool,
    pub published: bool,
    #[sqlx(rename = "display_order")]
    pub order: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

fn default_rating() -> i32 {
    5
}

fn require_rating(rating: i32) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::validation("rating must be between 1 and 5"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateTestimonialRequest {
    pub name: String,
    pub designation: String,
    #[serde(default)]
    pub company: Option<String>,
    pub image: String,
    pub content: String,
    #[serde(default = "default_rating")]
    pub rating: i32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_true")]
    pub published: bool,
    #[serde(default)]
    pub order: i32,
}

impl CreateTestimonialRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_text("name", &self.name)?;
        require_text("content", &self.content)?;
        require_rating(self.rating)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateTestimonialRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl UpdateTestimonialRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_opt_text("name", self.name.as_deref())?;
        match self.rating {
            Some(rating) => require_rating(rating),
            None => Ok(()),
        }
    }
}

// --- Brands ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    pub logo: String,
    pub website: Option<String>,
    #[sqlx(rename = "display_order")]
    pub order: i32,
    pub published: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateBrandRequest {
    pub name: String,
    pub logo: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub published: bool,
}

impl CreateBrandRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_text("name", &self.name)?;
        require_text("logo", &self.logo)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateBrandRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl UpdateBrandRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_opt_text("name", self.name.as_deref())
    }
}

// --- Pricing Plans ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct PricingPlan {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    /// Billing period label, e.g. "monthly" or "yearly".
    pub period: String,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub popular: bool,
    pub published: bool,
    #[sqlx(rename = "display_order")]
    pub order: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

fn require_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::validation("price must be a non-negative number"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreatePricingPlanRequest {
    pub name: String,
    pub price: f64,
    pub period: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default = "default_true")]
    pub published: bool,
    #[serde(default)]
    pub order: i32,
}

impl CreatePricingPlanRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_text("name", &self.name)?;
        require_text("period", &self.period)?;
        require_price(self.price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdatePricingPlanRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popular: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl UpdatePricingPlanRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_opt_text("name", self.name.as_deref())?;
        match self.price {
            Some(price) => require_price(price),
            None => Ok(()),
        }
    }
}
