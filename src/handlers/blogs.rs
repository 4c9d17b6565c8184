use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::{AdminUser, OptionalUser},
    error::{AppError, AppJson, AppPath, AppQuery, AppResult},
    models::{
        Blog, BlogFilter, BlogSummary, Comment, CreateBlogRequest, CreateCommentRequest,
        CreateTagRequest, MessageResponse, Page, Pagination, Tag, UpdateBlogRequest,
        UpdateTagRequest,
    },
};

// --- Query Parameters ---

/// BlogListParams
///
/// Query string of GET /api/blogs. `published` only takes effect for admins; everyone
/// else always sees published posts.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BlogListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
    /// Tag slug.
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct FeaturedParams {
    /// 1 to 10, default 3.
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CommentListParams {
    /// Admin only; forced to true for everyone else.
    pub approved_only: Option<bool>,
}

const FEATURED_DEFAULT: i64 = 3;
const FEATURED_MAX: i64 = 10;

// --- Blogs ---

/// list_blogs
///
/// [Public Route] Paginated listing, publish date descending.
#[utoipa::path(
    get,
    path = "/api/blogs",
    params(BlogListParams),
    responses(
        (status = 200, description = "One page of blogs", body = Page<BlogSummary>),
        (status = 400, description = "Invalid pagination")
    ),
    tag = "blogs"
)]
pub async fn list_blogs(
    viewer: OptionalUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<BlogListParams>,
) -> AppResult<Json<Page<BlogSummary>>> {
    let page = Pagination::new(params.skip, params.limit)?;
    let published = if viewer.is_admin() {
        params.published.unwrap_or(true)
    } else {
        true
    };
    let filter = BlogFilter {
        search: params.search.filter(|s| !s.trim().is_empty()),
        published: Some(published),
        featured: params.featured,
        tag: params.tag.filter(|s| !s.trim().is_empty()),
    };

    let (items, total) = state.repo.list_blogs(&filter, page).await?;
    Ok(Json(page.wrap(items, total)))
}

#[utoipa::path(
    get,
    path = "/api/blogs/featured",
    params(FeaturedParams),
    responses(
        (status = 200, description = "Featured published blogs", body = [BlogSummary]),
        (status = 400, description = "Limit out of range")
    ),
    tag = "blogs"
)]
pub async fn featured_blogs(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<FeaturedParams>,
) -> AppResult<Json<Vec<BlogSummary>>> {
    let limit = params.limit.unwrap_or(FEATURED_DEFAULT);
    if !(1..=FEATURED_MAX).contains(&limit) {
        return Err(AppError::validation(format!(
            "limit must be between 1 and {FEATURED_MAX}"
        )));
    }
    Ok(Json(state.repo.featured_blogs(limit).await?))
}

/// get_blog_by_slug
///
/// [Public Route] Detail read. Each read of a published blog counts as a view. Drafts
/// are visible to admins only and are not counted.
#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    params(("id" = String, Path, description = "Blog slug")),
    responses(
        (status = 200, description = "Found", body = Blog),
        (status = 404, description = "Not found")
    ),
    tag = "blogs"
)]
pub async fn get_blog_by_slug(
    viewer: OptionalUser,
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<Json<Blog>> {
    Ok(Json(
        state.repo.read_blog_by_slug(&slug, viewer.is_admin()).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/blogs/id/{id}",
    params(("id" = Uuid, Path, description = "Blog id")),
    responses(
        (status = 200, description = "Found", body = Blog),
        (status = 404, description = "Not found")
    ),
    tag = "blogs"
)]
pub async fn get_blog_by_id(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Blog>> {
    Ok(Json(state.repo.get_blog(id).await?))
}

/// create_blog
///
/// [Admin Route] The calling admin becomes the author.
#[utoipa::path(
    post,
    path = "/api/blogs",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Created", body = Blog),
        (status = 400, description = "Invalid input or slug already exists"),
        (status = 404, description = "Unknown tag id")
    ),
    tag = "blogs"
)]
pub async fn create_blog(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBlogRequest>,
) -> AppResult<(StatusCode, Json<Blog>)> {
    payload.validate()?;
    let blog = state.repo.create_blog(admin.id, payload).await?;
    tracing::info!(blog_id = %blog.id, slug = %blog.slug, "blog created");
    Ok((StatusCode::CREATED, Json(blog)))
}

#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    params(("id" = Uuid, Path, description = "Blog id")),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Updated", body = Blog),
        (status = 400, description = "Invalid input or slug already exists"),
        (status = 404, description = "Blog or tag not found")
    ),
    tag = "blogs"
)]
pub async fn update_blog(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateBlogRequest>,
) -> AppResult<Json<Blog>> {
    payload.validate()?;
    Ok(Json(state.repo.update_blog(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    params(("id" = Uuid, Path, description = "Blog id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found")
    ),
    tag = "blogs"
)]
pub async fn delete_blog(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.repo.delete_blog(id).await?;
    tracing::info!(blog_id = %id, "blog deleted");
    Ok(Json(MessageResponse::new("Blog deleted successfully")))
}

// --- Comments ---

/// list_comments
///
/// [Public Route] Newest first. Anonymous readers only ever see approved comments.
#[utoipa::path(
    get,
    path = "/api/blogs/{id}/comments",
    params(("id" = Uuid, Path, description = "Blog id"), CommentListParams),
    responses((status = 200, description = "Comments", body = [Comment])),
    tag = "comments"
)]
pub async fn list_comments(
    viewer: OptionalUser,
    State(state): State<AppState>,
    AppPath(blog_id): AppPath<Uuid>,
    AppQuery(params): AppQuery<CommentListParams>,
) -> AppResult<Json<Vec<Comment>>> {
    let approved_only = !viewer.is_admin() || params.approved_only.unwrap_or(true);
    Ok(Json(state.repo.list_comments(blog_id, approved_only).await?))
}

/// create_comment
///
/// [Public Route] Comments are held for moderation until an admin approves them.
#[utoipa::path(
    post,
    path = "/api/blogs/{id}/comments",
    params(("id" = Uuid, Path, description = "Blog id")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Created, pending approval", body = Comment),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Blog not found")
    ),
    tag = "comments"
)]
pub async fn create_comment(
    State(state): State<AppState>,
    AppPath(blog_id): AppPath<Uuid>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    payload.validate()?;
    let comment = state.repo.create_comment(blog_id, payload).await?;
    tracing::debug!(comment_id = %comment.id, blog_id = %blog_id, "comment submitted");
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    put,
    path = "/api/blogs/comments/{id}/approve",
    params(("id" = Uuid, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Approved", body = Comment),
        (status = 404, description = "Not found")
    ),
    tag = "comments"
)]
pub async fn approve_comment(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Comment>> {
    Ok(Json(state.repo.approve_comment(id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/blogs/comments/{id}",
    params(("id" = Uuid, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found")
    ),
    tag = "comments"
)]
pub async fn delete_comment(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.repo.delete_comment(id).await?;
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}

// --- Tags ---

#[utoipa::path(
    get,
    path = "/api/tags",
    responses((status = 200, description = "All tags, name ascending", body = [Tag])),
    tag = "tags"
)]
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    Ok(Json(state.repo.list_tags().await?))
}

#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Created", body = Tag),
        (status = 400, description = "Invalid input or name/slug already exists")
    ),
    tag = "tags"
)]
pub async fn create_tag(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTagRequest>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    payload.validate()?;
    Ok((StatusCode::CREATED, Json(state.repo.create_tag(payload).await?)))
}

#[utoipa::path(
    put,
    path = "/api/tags/{id}",
    params(("id" = Uuid, Path, description = "Tag id")),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, description = "Updated", body = Tag),
        (status = 400, description = "Invalid input or name/slug already exists"),
        (status = 404, description = "Not found")
    ),
    tag = "tags"
)]
pub async fn update_tag(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateTagRequest>,
) -> AppResult<Json<Tag>> {
    payload.validate()?;
    Ok(Json(state.repo.update_tag(id, payload).await?))
}

/// delete_tag
///
/// [Admin Route] Detaches the tag from every blog; the blogs themselves stay.
#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    params(("id" = Uuid, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found")
    ),
    tag = "tags"
)]
pub async fn delete_tag(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.repo.delete_tag(id).await?;
    Ok(Json(MessageResponse::new("Tag deleted successfully")))
}
