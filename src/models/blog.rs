use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{User, require_email, require_opt_text, require_slug, require_text};
use crate::error::AppResult;

pub const DEFAULT_TAG_COLOR: &str = "#3B82F6";

/// Tag
///
/// Row of the `tags` table. Linked to blogs through `blog_tags`; deleting a tag removes
/// only the association rows.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateTagRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl CreateTagRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_text("name", &self.name)?;
        require_slug(&self.slug)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateTagRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl UpdateTagRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_opt_text("name", self.name.as_deref())?;
        match &self.slug {
            Some(slug) => require_slug(slug),
            None => Ok(()),
        }
    }
}

/// BlogRecord
///
/// Raw row of the `blogs` table. Author and tags are resolved separately and attached
/// when building [`Blog`] / [`BlogSummary`].
#[derive(Debug, Clone, FromRow)]
pub struct BlogRecord {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image: String,
    pub slug: String,
    pub published: bool,
    pub featured: bool,
    pub views: i32,
    pub publish_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
}

/// Blog
///
/// Full blog post as served by the detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image: String,
    pub slug: String,
    pub published: bool,
    pub featured: bool,
    pub views: i32,
    #[ts(type = "string")]
    pub publish_date: DateTime<Utc>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
    pub author: User,
    pub tags: Vec<Tag>,
}

impl Blog {
    pub fn assemble(record: BlogRecord, author: User, tags: Vec<Tag>) -> Self {
        Self {
            id: record.id,
            title: record.title,
            content: record.content,
            excerpt: record.excerpt,
            image: record.image,
            slug: record.slug,
            published: record.published,
            featured: record.featured,
            views: record.views,
            publish_date: record.publish_date,
            created_at: record.created_at,
            updated_at: record.updated_at,
            author,
            tags,
        }
    }
}

/// BlogSummary
///
/// Listing row: the detail minus `content` and the bookkeeping timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub image: String,
    pub slug: String,
    pub published: bool,
    pub featured: bool,
    pub views: i32,
    #[ts(type = "string")]
    pub publish_date: DateTime<Utc>,
    pub author: User,
    pub tags: Vec<Tag>,
}

impl From<Blog> for BlogSummary {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            excerpt: blog.excerpt,
            image: blog.image,
            slug: blog.slug,
            published: blog.published,
            featured: blog.featured,
            views: blog.views,
            publish_date: blog.publish_date,
            author: blog.author,
            tags: blog.tags,
        }
    }
}

/// BlogFilter
///
/// Repository-level listing predicate. `search` matches title, excerpt and content
/// case-insensitively; `tag` is a tag slug.
#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    pub search: Option<String>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub tag: Option<String>,
}

/// CreateBlogRequest
///
/// Input payload for POST /api/blogs. The author is always the calling admin.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image: String,
    pub slug: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

impl CreateBlogRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)?;
        require_slug(&self.slug)
    }
}

/// UpdateBlogRequest
///
/// Partial update for PUT /api/blogs/{id}. When `tag_ids` is present, even empty, it
/// replaces the whole association set.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateBlogRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<Uuid>>,
}

impl UpdateBlogRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_opt_text("title", self.title.as_deref())?;
        require_opt_text("content", self.content.as_deref())?;
        match &self.slug {
            Some(slug) => require_slug(slug),
            None => Ok(()),
        }
    }
}

/// Comment
///
/// Reader comment on a blog. Authorship is free text, not a user account. New comments
/// always start unapproved.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author_name: String,
    pub author_email: String,
    pub approved: bool,
    pub blog_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// CreateCommentRequest
///
/// There is deliberately no `approved` field; unknown keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateCommentRequest {
    pub content: String,
    pub author_name: String,
    pub author_email: String,
}

impl CreateCommentRequest {
    pub fn validate(&self) -> AppResult<()> {
        require_text("content", &self.content)?;
        require_text("author_name", &self.author_name)?;
        require_email(&self.author_email)
    }
}
