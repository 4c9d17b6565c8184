use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder, postgres::PgQueryResult};
use std::collections::HashMap;
use uuid::Uuid;

use super::{Repository, messages::*};
use crate::error::{AppError, AppResult, classify_db_error};
use crate::models::{
    Blog, BlogFilter, BlogRecord, BlogSummary, Brand, BulkAction, CatalogFilter, Comment, Contact,
    ContactFilter, ContactStatus, CreateBlogRequest, CreateBrandRequest, CreateCommentRequest,
    CreateContactRequest, CreateFeatureRequest, CreateMenuItemRequest, CreatePricingPlanRequest,
    CreateTagRequest, CreateTestimonialRequest, DEFAULT_TAG_COLOR, DashboardStats, Feature,
    MenuItem, MenuNode, NewUser, Pagination, PricingPlan, ReorderEntry, SettingType, SiteSetting,
    Subscriber, Subscription, Tag, Testimonial, Unsubscription, UpdateBlogRequest,
    UpdateBrandRequest, UpdateFeatureRequest, UpdateMenuItemRequest, UpdatePricingPlanRequest,
    UpdateTagRequest, UpdateTestimonialRequest, UpdateUserRequest, UpsertSettingRequest, User,
    UserRecord,
};

const USER_RECORD_COLUMNS: &str = "id, email, name, password, role, created_at, updated_at";
const USER_COLUMNS: &str = "id, email, name, role, created_at, updated_at";
const BLOG_COLUMNS: &str = "id, title, content, excerpt, image, slug, published, featured, \
     views, publish_date, created_at, updated_at, author_id";
const COMMENT_COLUMNS: &str =
    "id, content, author_name, author_email, approved, blog_id, created_at, updated_at";
const FEATURE_COLUMNS: &str =
    "id, title, description, icon, display_order, published, created_at, updated_at";
const TESTIMONIAL_COLUMNS: &str = "id, name, designation, company, image, content, rating, \
     featured, published, display_order, created_at, updated_at";
const BRAND_COLUMNS: &str =
    "id, name, logo, website, display_order, published, created_at, updated_at";
const PLAN_COLUMNS: &str = "id, name, price, period, description, features, popular, \
     published, display_order, created_at, updated_at";
const CONTACT_COLUMNS: &str =
    "id, name, email, subject, message, status, created_at, updated_at";
const SUBSCRIBER_COLUMNS: &str = "id, email, active, created_at, updated_at";
const MENU_COLUMNS: &str =
    "id, title, path, new_tab, display_order, published, parent_id, created_at, updated_at";
const SETTING_COLUMNS: &str = "id, key, value, type, description, updated_at";

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
/// Queries are built at runtime (`query_as` / `QueryBuilder`) with every user-supplied
/// value bound as a parameter.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Tag row joined with the blog it is attached to.
#[derive(FromRow)]
struct BlogTagRow {
    blog_id: Uuid,
    id: Uuid,
    name: String,
    slug: String,
    color: String,
}

fn require_affected(result: PgQueryResult, missing: &str) -> AppResult<()> {
    if result.rows_affected() == 0 {
        return Err(AppError::not_found(missing));
    }
    Ok(())
}

/// Literal substring pattern for `ILIKE`; `\` is the default escape character.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("%{escaped}%")
}

fn catalog_listing(table: &str, columns: &str, filter: CatalogFilter, featurable: bool) -> String {
    let mut sql = format!("SELECT {columns} FROM {table} WHERE 1 = 1");
    if filter.published_only {
        sql.push_str(" AND published = true");
    }
    if featurable && filter.featured_only {
        sql.push_str(" AND featured = true");
    }
    sql.push_str(" ORDER BY display_order ASC, created_at ASC");
    sql
}

/// hydrate_blogs
///
/// Attaches authors and tags to raw blog rows with two batched lookups, preserving the
/// input order. Runs on whatever connection the caller holds so it can join a transaction.
async fn hydrate_blogs(
    conn: &mut PgConnection,
    records: Vec<BlogRecord>,
) -> Result<Vec<Blog>, sqlx::Error> {
    if records.is_empty() {
        return Ok(vec![]);
    }

    let blog_ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
    let author_ids: Vec<Uuid> = records.iter().map(|r| r.author_id).collect();

    let authors: HashMap<Uuid, User> = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
    ))
    .bind(&author_ids)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(|user| (user.id, user))
    .collect();

    let tag_rows = sqlx::query_as::<_, BlogTagRow>(
        r#"
        SELECT bt.blog_id, t.id, t.name, t.slug, t.color
        FROM blog_tags bt
        JOIN tags t ON t.id = bt.tag_id
        WHERE bt.blog_id = ANY($1)
        ORDER BY t.name ASC
        "#,
    )
    .bind(&blog_ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut tags: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for row in tag_rows {
        tags.entry(row.blog_id).or_default().push(Tag {
            id: row.id,
            name: row.name,
            slug: row.slug,
            color: row.color,
        });
    }

    records
        .into_iter()
        .map(|record| -> Result<Blog, sqlx::Error> {
            // author_id is a non-null foreign key, so the lookup cannot miss.
            let author = authors
                .get(&record.author_id)
                .cloned()
                .ok_or(sqlx::Error::RowNotFound)?;
            let blog_tags = tags.remove(&record.id).unwrap_or_default();
            Ok(Blog::assemble(record, author, blog_tags))
        })
        .collect()
}

async fn hydrate_one(conn: &mut PgConnection, record: BlogRecord) -> AppResult<Blog> {
    hydrate_blogs(conn, vec![record])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found(BLOG_NOT_FOUND))
}

/// Verifies every id exists, then links them to the blog. Duplicates are collapsed.
async fn attach_tags(conn: &mut PgConnection, blog_id: Uuid, tag_ids: &[Uuid]) -> AppResult<()> {
    let mut unique = tag_ids.to_vec();
    unique.sort();
    unique.dedup();
    if unique.is_empty() {
        return Ok(());
    }

    let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags WHERE id = ANY($1)")
        .bind(&unique)
        .fetch_one(&mut *conn)
        .await?;
    if found != unique.len() as i64 {
        return Err(AppError::not_found(TAG_NOT_FOUND));
    }

    sqlx::query("INSERT INTO blog_tags (blog_id, tag_id) SELECT $1, UNNEST($2::uuid[])")
        .bind(blog_id)
        .bind(&unique)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Rejects `parent_id` as the new parent of `id` when it lies in the subtree of `id`.
/// `UNION` stops the walk even if the stored chain already loops.
async fn ensure_not_descendant(
    conn: &mut PgConnection,
    id: Uuid,
    parent_id: Uuid,
) -> AppResult<()> {
    let loops = sqlx::query_scalar::<_, bool>(
        r#"
        WITH RECURSIVE ancestors(id, parent_id) AS (
            SELECT id, parent_id FROM menu_items WHERE id = $1
            UNION
            SELECT m.id, m.parent_id FROM menu_items m JOIN ancestors a ON m.id = a.parent_id
        )
        SELECT EXISTS (SELECT 1 FROM ancestors WHERE id = $2)
        "#,
    )
    .bind(parent_id)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    if loops {
        return Err(AppError::validation(PARENT_IS_DESCENDANT));
    }
    Ok(())
}

fn push_blog_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BlogFilter) {
    if let Some(published) = filter.published {
        builder.push(" AND b.published = ");
        builder.push_bind(published);
    }
    if let Some(featured) = filter.featured {
        builder.push(" AND b.featured = ");
        builder.push_bind(featured);
    }
    if let Some(search) = &filter.search {
        // Case-insensitive search across title, excerpt and content.
        let pattern = like_pattern(search);
        builder.push(" AND (b.title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR b.excerpt ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR b.content ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
    if let Some(tag) = &filter.tag {
        builder.push(
            " AND EXISTS (SELECT 1 FROM blog_tags bt JOIN tags t ON t.id = bt.tag_id \
             WHERE bt.blog_id = b.id AND t.slug = ",
        );
        builder.push_bind(tag.clone());
        builder.push(")");
    }
}

fn push_contact_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ContactFilter) {
    if let Some(status) = filter.status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder.push(" AND (name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR email ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR subject ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR message ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS ---

    async fn find_user(&self, id: Uuid) -> AppResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_RECORD_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_RECORD_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, name, password, role) VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user.email)
        .bind(user.name)
        .bind(user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, EMAIL_TAKEN, USER_NOT_FOUND))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// update_user
    ///
    /// Partial update through `COALESCE`: a column only changes when the matching request
    /// field is `Some`.
    async fn update_user(&self, id: Uuid, req: UpdateUserRequest) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.name)
        .bind(req.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, EMAIL_TAKEN, USER_NOT_FOUND))?
        .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        // blogs -> comments / blog_tags cascade through ON DELETE CASCADE in one statement.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_affected(result, USER_NOT_FOUND)
    }

    // --- TAGS ---

    async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name, slug, color FROM tags ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    async fn create_tag(&self, req: CreateTagRequest) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (id, name, slug, color) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, slug, color",
        )
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.slug)
        .bind(req.color.unwrap_or_else(|| DEFAULT_TAG_COLOR.to_string()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, TAG_TAKEN, TAG_NOT_FOUND))
    }

    async fn update_tag(&self, id: Uuid, req: UpdateTagRequest) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                color = COALESCE($4, color)
            WHERE id = $1
            RETURNING id, name, slug, color
            "#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.slug)
        .bind(req.color)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, TAG_TAKEN, TAG_NOT_FOUND))?
        .ok_or_else(|| AppError::not_found(TAG_NOT_FOUND))
    }

    async fn delete_tag(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_affected(result, TAG_NOT_FOUND)
    }

    // --- BLOGS ---

    /// list_blogs
    ///
    /// The same filter predicate feeds both the page query and the count query, so
    /// `total` never depends on the page window.
    async fn list_blogs(
        &self,
        filter: &BlogFilter,
        page: Pagination,
    ) -> AppResult<(Vec<BlogSummary>, i64)> {
        let mut conn = self.pool.acquire().await?;

        let mut count: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM blogs b WHERE 1 = 1");
        push_blog_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&mut *conn).await?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {BLOG_COLUMNS} FROM blogs b WHERE 1 = 1"));
        push_blog_filter(&mut builder, filter);
        builder.push(" ORDER BY b.publish_date DESC, b.created_at DESC LIMIT ");
        builder.push_bind(page.limit);
        builder.push(" OFFSET ");
        builder.push_bind(page.skip);

        let records = builder
            .build_query_as::<BlogRecord>()
            .fetch_all(&mut *conn)
            .await?;
        let blogs = hydrate_blogs(&mut conn, records).await?;
        Ok((blogs.into_iter().map(BlogSummary::from).collect(), total))
    }

    async fn featured_blogs(&self, limit: i64) -> AppResult<Vec<BlogSummary>> {
        let mut conn = self.pool.acquire().await?;
        let records = sqlx::query_as::<_, BlogRecord>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE published = true AND featured = true \
             ORDER BY publish_date DESC, created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;
        let blogs = hydrate_blogs(&mut conn, records).await?;
        Ok(blogs.into_iter().map(BlogSummary::from).collect())
    }

    /// read_blog_by_slug
    ///
    /// The view increment and the read are one `UPDATE ... RETURNING` inside a
    /// transaction, so concurrent readers each count exactly once.
    async fn read_blog_by_slug(&self, slug: &str, include_unpublished: bool) -> AppResult<Blog> {
        let mut tx = self.pool.begin().await?;

        let mut record = sqlx::query_as::<_, BlogRecord>(&format!(
            "UPDATE blogs SET views = views + 1 WHERE slug = $1 AND published = true \
             RETURNING {BLOG_COLUMNS}"
        ))
        .bind(slug)
        .fetch_optional(&mut *tx)
        .await?;

        if record.is_none() && include_unpublished {
            record = sqlx::query_as::<_, BlogRecord>(&format!(
                "SELECT {BLOG_COLUMNS} FROM blogs WHERE slug = $1"
            ))
            .bind(slug)
            .fetch_optional(&mut *tx)
            .await?;
        }

        let record = record.ok_or_else(|| AppError::not_found(BLOG_NOT_FOUND))?;
        let blog = hydrate_one(&mut tx, record).await?;
        tx.commit().await?;
        Ok(blog)
    }

    async fn get_blog(&self, id: Uuid) -> AppResult<Blog> {
        let mut conn = self.pool.acquire().await?;
        let record = sqlx::query_as::<_, BlogRecord>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::not_found(BLOG_NOT_FOUND))?;
        hydrate_one(&mut conn, record).await
    }

    /// create_blog
    ///
    /// Insert and tag attachment share one transaction: an unknown tag id leaves no blog
    /// row behind.
    async fn create_blog(&self, author_id: Uuid, req: CreateBlogRequest) -> AppResult<Blog> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BlogRecord>(&format!(
            r#"
            INSERT INTO blogs (id, title, content, excerpt, image, slug, published, featured, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(req.title)
        .bind(req.content)
        .bind(req.excerpt)
        .bind(req.image)
        .bind(req.slug)
        .bind(req.published)
        .bind(req.featured)
        .bind(author_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify_db_error(e, SLUG_TAKEN, AUTHOR_NOT_FOUND))?;

        attach_tags(&mut tx, record.id, &req.tag_ids).await?;
        let blog = hydrate_one(&mut tx, record).await?;
        tx.commit().await?;
        Ok(blog)
    }

    async fn update_blog(&self, id: Uuid, req: UpdateBlogRequest) -> AppResult<Blog> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BlogRecord>(&format!(
            r#"
            UPDATE blogs
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                excerpt = COALESCE($4, excerpt),
                image = COALESCE($5, image),
                slug = COALESCE($6, slug),
                published = COALESCE($7, published),
                featured = COALESCE($8, featured),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.title)
        .bind(req.content)
        .bind(req.excerpt)
        .bind(req.image)
        .bind(req.slug)
        .bind(req.published)
        .bind(req.featured)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| classify_db_error(e, SLUG_TAKEN, BLOG_NOT_FOUND))?
        .ok_or_else(|| AppError::not_found(BLOG_NOT_FOUND))?;

        if let Some(tag_ids) = req.tag_ids {
            sqlx::query("DELETE FROM blog_tags WHERE blog_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            attach_tags(&mut tx, id, &tag_ids).await?;
        }

        let blog = hydrate_one(&mut tx, record).await?;
        tx.commit().await?;
        Ok(blog)
    }

    async fn delete_blog(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_affected(result, BLOG_NOT_FOUND)
    }

    // --- COMMENTS ---

    async fn list_comments(&self, blog_id: Uuid, approved_only: bool) -> AppResult<Vec<Comment>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE blog_id = "));
        builder.push_bind(blog_id);
        if approved_only {
            builder.push(" AND approved = true");
        }
        builder.push(" ORDER BY created_at DESC");

        let comments = builder
            .build_query_as::<Comment>()
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    /// create_comment
    ///
    /// `approved` is never taken from the caller; new comments wait for moderation.
    async fn create_comment(
        &self,
        blog_id: Uuid,
        req: CreateCommentRequest,
    ) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (id, content, author_name, author_email, approved, blog_id) \
             VALUES ($1, $2, $3, $4, false, $5) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(req.content)
        .bind(req.author_name)
        .bind(req.author_email)
        .bind(blog_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, COMMENT_NOT_FOUND, BLOG_NOT_FOUND))
    }

    async fn approve_comment(&self, id: Uuid) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments SET approved = true, updated_at = NOW() WHERE id = $1 \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(COMMENT_NOT_FOUND))
    }

    async fn delete_comment(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_affected(result, COMMENT_NOT_FOUND)
    }

    // --- FEATURES ---

    async fn list_features(&self, filter: CatalogFilter) -> AppResult<Vec<Feature>> {
        let sql = catalog_listing("features", FEATURE_COLUMNS, filter, false);
        Ok(sqlx::query_as::<_, Feature>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_feature(&self, id: Uuid) -> AppResult<Feature> {
        sqlx::query_as::<_, Feature>(&format!("SELECT {FEATURE_COLUMNS} FROM features WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(FEATURE_NOT_FOUND))
    }

    async fn create_feature(&self, req: CreateFeatureRequest) -> AppResult<Feature> {
        sqlx::query_as::<_, Feature>(&format!(
            "INSERT INTO features (id, title, description, icon, display_order, published) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {FEATURE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(req.title)
        .bind(req.description)
        .bind(req.icon)
        .bind(req.order)
        .bind(req.published)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, FEATURE_TAKEN, FEATURE_NOT_FOUND))
    }

    async fn update_feature(&self, id: Uuid, req: UpdateFeatureRequest) -> AppResult<Feature> {
        sqlx::query_as::<_, Feature>(&format!(
            r#"
            UPDATE features
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                icon = COALESCE($4, icon),
                display_order = COALESCE($5, display_order),
                published = COALESCE($6, published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {FEATURE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.icon)
        .bind(req.order)
        .bind(req.published)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, FEATURE_TAKEN, FEATURE_NOT_FOUND))?
        .ok_or_else(|| AppError::not_found(FEATURE_NOT_FOUND))
    }

    async fn delete_feature(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM features WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_affected(result, FEATURE_NOT_FOUND)
    }

    // --- TESTIMONIALS ---

    async fn list_testimonials(&self, filter: CatalogFilter) -> AppResult<Vec<Testimonial>> {
        let sql = catalog_listing("testimonials", TESTIMONIAL_COLUMNS, filter, true);
        Ok(sqlx::query_as::<_, Testimonial>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_testimonial(&self, id: Uuid) -> AppResult<Testimonial> {
        sqlx::query_as::<_, Testimonial>(&format!(
            "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(TESTIMONIAL_NOT_FOUND))
    }

    async fn create_testimonial(&self, req: CreateTestimonialRequest) -> AppResult<Testimonial> {
        sqlx::query_as::<_, Testimonial>(&format!(
            r#"
            INSERT INTO testimonials
                (id, name, designation, company, image, content, rating, featured, published, display_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {TESTIMONIAL_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.designation)
        .bind(req.company)
        .bind(req.image)
        .bind(req.content)
        .bind(req.rating)
        .bind(req.featured)
        .bind(req.published)
        .bind(req.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, TESTIMONIAL_TAKEN, TESTIMONIAL_NOT_FOUND))
    }

    async fn update_testimonial(
        &self,
        id: Uuid,
        req: UpdateTestimonialRequest,
    ) -> AppResult<Testimonial> {
        sqlx::query_as::<_, Testimonial>(&format!(
            r#"
            UPDATE testimonials
            SET name = COALESCE($2, name),
                designation = COALESCE($3, designation),
                company = COALESCE($4, company),
                image = COALESCE($5, image),
                content = COALESCE($6, content),
                rating = COALESCE($7, rating),
                featured = COALESCE($8, featured),
                published = COALESCE($9, published),
                display_order = COALESCE($10, display_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TESTIMONIAL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.name)
        .bind(req.designation)
        .bind(req.company)
        .bind(req.image)
        .bind(req.content)
        .bind(req.rating)
        .bind(req.featured)
        .bind(req.published)
        .bind(req.order)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, TESTIMONIAL_TAKEN, TESTIMONIAL_NOT_FOUND))?
        .ok_or_else(|| AppError::not_found(TESTIMONIAL_NOT_FOUND))
    }

    async fn delete_testimonial(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_affected(result, TESTIMONIAL_NOT_FOUND)
    }

    // --- BRANDS ---

    async fn list_brands(&self, filter: CatalogFilter) -> AppResult<Vec<Brand>> {
        let sql = catalog_listing("brands", BRAND_COLUMNS, filter, false);
        Ok(sqlx::query_as::<_, Brand>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_brand(&self, id: Uuid) -> AppResult<Brand> {
        sqlx::query_as::<_, Brand>(&format!("SELECT {BRAND_COLUMNS} FROM brands WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(BRAND_NOT_FOUND))
    }

    async fn create_brand(&self, req: CreateBrandRequest) -> AppResult<Brand> {
        sqlx::query_as::<_, Brand>(&format!(
            "INSERT INTO brands (id, name, logo, website, display_order, published) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {BRAND_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.logo)
        .bind(req.website)
        .bind(req.order)
        .bind(req.published)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, BRAND_TAKEN, BRAND_NOT_FOUND))
    }

    async fn update_brand(&self, id: Uuid, req: UpdateBrandRequest) -> AppResult<Brand> {
        sqlx::query_as::<_, Brand>(&format!(
            r#"
            UPDATE brands
            SET name = COALESCE($2, name),
                logo = COALESCE($3, logo),
                website = COALESCE($4, website),
                display_order = COALESCE($5, display_order),
                published = COALESCE($6, published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BRAND_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.name)
        .bind(req.logo)
        .bind(req.website)
        .bind(req.order)
        .bind(req.published)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, BRAND_TAKEN, BRAND_NOT_FOUND))?
        .ok_or_else(|| AppError::not_found(BRAND_NOT_FOUND))
    }

    async fn delete_brand(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_affected(result, BRAND_NOT_FOUND)
    }

    // --- PRICING PLANS ---

    async fn list_pricing_plans(&self, filter: CatalogFilter) -> AppResult<Vec<PricingPlan>> {
        let sql = catalog_listing("pricing_plans", PLAN_COLUMNS, filter, false);
        Ok(sqlx::query_as::<_, PricingPlan>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_pricing_plan(&self, id: Uuid) -> AppResult<PricingPlan> {
        sqlx::query_as::<_, PricingPlan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM pricing_plans WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(PLAN_NOT_FOUND))
    }

    async fn create_pricing_plan(&self, req: CreatePricingPlanRequest) -> AppResult<PricingPlan> {
        sqlx::query_as::<_, PricingPlan>(&format!(
            r#"
            INSERT INTO pricing_plans
                (id, name, price, period, description, features, popular, published, display_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.price)
        .bind(req.period)
        .bind(req.description)
        .bind(req.features)
        .bind(req.popular)
        .bind(req.published)
        .bind(req.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, PLAN_TAKEN, PLAN_NOT_FOUND))
    }

    async fn update_pricing_plan(
        &self,
        id: Uuid,
        req: UpdatePricingPlanRequest,
    ) -> AppResult<PricingPlan> {
        sqlx::query_as::<_, PricingPlan>(&format!(
            r#"
            UPDATE pricing_plans
            SET name = COALESCE($2, name),
                price = COALESCE($3, price),
                period = COALESCE($4, period),
                description = COALESCE($5, description),
                features = COALESCE($6, features),
                popular = COALESCE($7, popular),
                published = COALESCE($8, published),
                display_order = COALESCE($9, display_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.name)
        .bind(req.price)
        .bind(req.period)
        .bind(req.description)
        .bind(req.features)
        .bind(req.popular)
        .bind(req.published)
        .bind(req.order)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, PLAN_TAKEN, PLAN_NOT_FOUND))?
        .ok_or_else(|| AppError::not_found(PLAN_NOT_FOUND))
    }

    async fn delete_pricing_plan(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM pricing_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_affected(result, PLAN_NOT_FOUND)
    }

    // --- CONTACTS ---

    async fn create_contact(&self, req: CreateContactRequest) -> AppResult<Contact> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "INSERT INTO contacts (id, name, email, subject, message, status) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.email)
        .bind(req.subject)
        .bind(req.message)
        .bind(ContactStatus::Unread)
        .fetch_one(&self.pool)
        .await?;
        Ok(contact)
    }

    async fn list_contacts(
        &self,
        filter: &ContactFilter,
        page: Pagination,
    ) -> AppResult<(Vec<Contact>, i64)> {
        let mut count: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM contacts WHERE 1 = 1");
        push_contact_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE 1 = 1"));
        push_contact_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(page.limit);
        builder.push(" OFFSET ");
        builder.push_bind(page.skip);

        let contacts = builder
            .build_query_as::<Contact>()
            .fetch_all(&self.pool)
            .await?;
        Ok((contacts, total))
    }

    async fn get_contact(&self, id: Uuid) -> AppResult<Contact> {
        sqlx::query_as::<_, Contact>(&format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(CONTACT_NOT_FOUND))
    }

    async fn set_contact_status(&self, id: Uuid, status: ContactStatus) -> AppResult<Contact> {
        sqlx::query_as::<_, Contact>(&format!(
            "UPDATE contacts SET status = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(CONTACT_NOT_FOUND))
    }

    async fn delete_contact(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_affected(result, CONTACT_NOT_FOUND)
    }

    // --- NEWSLETTER ---

    /// subscribe
    ///
    /// `ON CONFLICT DO NOTHING` keeps one row per email; an existing inactive row is
    /// flipped back on instead of duplicated.
    async fn subscribe(&self, email: &str) -> AppResult<Subscription> {
        let inserted = sqlx::query(
            "INSERT INTO newsletters (id, email, active) VALUES ($1, $2, true) \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .execute(&self.pool)
        .await?;
        if inserted.rows_affected() > 0 {
            return Ok(Subscription::Created);
        }

        let reactivated = sqlx::query(
            "UPDATE newsletters SET active = true, updated_at = NOW() \
             WHERE email = $1 AND active = false",
        )
        .bind(email)
        .execute(&self.pool)
        .await?;
        if reactivated.rows_affected() > 0 {
            Ok(Subscription::Reactivated)
        } else {
            Ok(Subscription::AlreadyActive)
        }
    }

    async fn unsubscribe(&self, email: &str) -> AppResult<Unsubscription> {
        let deactivated = sqlx::query(
            "UPDATE newsletters SET active = false, updated_at = NOW() \
             WHERE email = $1 AND active = true",
        )
        .bind(email)
        .execute(&self.pool)
        .await?;
        if deactivated.rows_affected() > 0 {
            return Ok(Unsubscription::Deactivated);
        }

        let known =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM newsletters WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        if known {
            Ok(Unsubscription::AlreadyInactive)
        } else {
            Err(AppError::not_found(EMAIL_NOT_SUBSCRIBED))
        }
    }

    async fn list_subscribers(
        &self,
        active_only: bool,
        page: Pagination,
    ) -> AppResult<(Vec<Subscriber>, i64)> {
        let predicate = if active_only { " WHERE active = true" } else { "" };

        let total =
            sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM newsletters{predicate}"))
                .fetch_one(&self.pool)
                .await?;

        let subscribers = sqlx::query_as::<_, Subscriber>(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM newsletters{predicate} \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;
        Ok((subscribers, total))
    }

    async fn delete_subscriber(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM newsletters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_affected(result, SUBSCRIBER_NOT_FOUND)
    }

    // --- NAVIGATION MENU ---

    /// menu_tree
    ///
    /// Two queries: the top-level items, then the direct children of those items.
    /// Grandchildren are never fetched.
    async fn menu_tree(&self, include_unpublished: bool) -> AppResult<Vec<MenuNode>> {
        let visibility = if include_unpublished { "" } else { " AND published = true" };
        let mut conn = self.pool.acquire().await?;

        let parents = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_COLUMNS} FROM menu_items WHERE parent_id IS NULL{visibility} \
             ORDER BY display_order ASC, created_at ASC"
        ))
        .fetch_all(&mut *conn)
        .await?;

        let parent_ids: Vec<Uuid> = parents.iter().map(|p| p.id).collect();
        let children = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_COLUMNS} FROM menu_items WHERE parent_id = ANY($1){visibility} \
             ORDER BY display_order ASC, created_at ASC"
        ))
        .bind(&parent_ids)
        .fetch_all(&mut *conn)
        .await?;

        let mut by_parent: HashMap<Uuid, Vec<MenuItem>> = HashMap::new();
        for child in children {
            if let Some(parent_id) = child.parent_id {
                by_parent.entry(parent_id).or_default().push(child);
            }
        }

        Ok(parents
            .into_iter()
            .map(|parent| {
                let kids = by_parent.remove(&parent.id).unwrap_or_default();
                MenuNode::new(parent, kids)
            })
            .collect())
    }

    async fn create_menu_item(&self, req: CreateMenuItemRequest) -> AppResult<MenuItem> {
        sqlx::query_as::<_, MenuItem>(&format!(
            "INSERT INTO menu_items (id, title, path, new_tab, display_order, published, parent_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {MENU_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(req.title)
        .bind(req.path)
        .bind(req.new_tab)
        .bind(req.order)
        .bind(req.published)
        .bind(req.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_db_error(e, MENU_ITEM_NOT_FOUND, PARENT_NOT_FOUND))
    }

    async fn update_menu_item(&self, id: Uuid, req: UpdateMenuItemRequest) -> AppResult<MenuItem> {
        if req.parent_id == Some(id) {
            return Err(AppError::validation(PARENT_IS_SELF));
        }

        let mut tx = self.pool.begin().await?;
        if let Some(parent_id) = req.parent_id {
            ensure_not_descendant(&mut tx, id, parent_id).await?;
        }

        let item = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            UPDATE menu_items
            SET title = COALESCE($2, title),
                path = COALESCE($3, path),
                new_tab = COALESCE($4, new_tab),
                display_order = COALESCE($5, display_order),
                published = COALESCE($6, published),
                parent_id = COALESCE($7, parent_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {MENU_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.title)
        .bind(req.path)
        .bind(req.new_tab)
        .bind(req.order)
        .bind(req.published)
        .bind(req.parent_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| classify_db_error(e, MENU_ITEM_NOT_FOUND, PARENT_NOT_FOUND))?
        .ok_or_else(|| AppError::not_found(MENU_ITEM_NOT_FOUND))?;

        tx.commit().await?;
        Ok(item)
    }

    async fn delete_menu_item(&self, id: Uuid) -> AppResult<()> {
        // Descendants go with it through the self-referencing ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        require_affected(result, MENU_ITEM_NOT_FOUND)
    }

    /// reorder_menu
    ///
    /// Applies every entry inside one transaction. Returning early drops `tx`, which
    /// rolls back whatever was already applied.
    async fn reorder_menu(&self, entries: Vec<ReorderEntry>) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for entry in entries {
            if entry.parent_id == Some(entry.id) {
                return Err(AppError::validation(PARENT_IS_SELF));
            }
            if let Some(parent_id) = entry.parent_id {
                ensure_not_descendant(&mut tx, entry.id, parent_id).await?;
            }
            let result = sqlx::query(
                "UPDATE menu_items SET display_order = $2, parent_id = $3, updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(entry.id)
            .bind(entry.order)
            .bind(entry.parent_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| classify_db_error(e, MENU_ITEM_NOT_FOUND, PARENT_NOT_FOUND))?;
            require_affected(result, MENU_ITEM_NOT_FOUND)?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn bulk_menu_action(&self, ids: Vec<Uuid>, action: BulkAction) -> AppResult<u64> {
        let mut unique = ids;
        unique.sort();
        unique.dedup();

        let mut tx = self.pool.begin().await?;

        let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM menu_items WHERE id = ANY($1)")
            .bind(&unique)
            .fetch_one(&mut *tx)
            .await?;
        if found != unique.len() as i64 {
            return Err(AppError::not_found(MENU_ITEM_NOT_FOUND));
        }

        let result = match action {
            BulkAction::Publish | BulkAction::Unpublish => {
                sqlx::query(
                    "UPDATE menu_items SET published = $2, updated_at = NOW() WHERE id = ANY($1)",
                )
                .bind(&unique)
                .bind(action == BulkAction::Publish)
                .execute(&mut *tx)
                .await?
            }
            BulkAction::Delete => {
                sqlx::query("DELETE FROM menu_items WHERE id = ANY($1)")
                    .bind(&unique)
                    .execute(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    // --- SITE SETTINGS ---

    async fn list_settings(&self) -> AppResult<Vec<SiteSetting>> {
        let settings = sqlx::query_as::<_, SiteSetting>(&format!(
            "SELECT {SETTING_COLUMNS} FROM site_settings ORDER BY key ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(settings)
    }

    async fn get_setting(&self, key: &str) -> AppResult<SiteSetting> {
        sqlx::query_as::<_, SiteSetting>(&format!(
            "SELECT {SETTING_COLUMNS} FROM site_settings WHERE key = $1"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(SETTING_NOT_FOUND))
    }

    /// upsert_setting
    ///
    /// The stored row is locked while the effective type is resolved and the value is
    /// checked against it.
    async fn upsert_setting(&self, key: &str, req: UpsertSettingRequest) -> AppResult<SiteSetting> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, SiteSetting>(&format!(
            "SELECT {SETTING_COLUMNS} FROM site_settings WHERE key = $1 FOR UPDATE"
        ))
        .bind(key)
        .fetch_optional(&mut *tx)
        .await?;

        let value_type = req
            .value_type
            .or(existing.as_ref().map(|s| s.value_type))
            .unwrap_or(SettingType::String);
        value_type.check(&req.value)?;

        let setting = sqlx::query_as::<_, SiteSetting>(&format!(
            r#"
            INSERT INTO site_settings (id, key, value, type, description)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value,
                type = EXCLUDED.type,
                description = COALESCE(EXCLUDED.description, site_settings.description),
                updated_at = NOW()
            RETURNING {SETTING_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(key)
        .bind(req.value)
        .bind(value_type)
        .bind(req.description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(setting)
    }

    async fn delete_setting(&self, key: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM site_settings WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        require_affected(result, SETTING_NOT_FOUND)
    }

    // --- ADMIN ---

    /// dashboard_stats
    ///
    /// Compiles every counter for the administrative dashboard in a single round trip.
    async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        let (
            total_users,
            total_blogs,
            published_blogs,
            pending_comments,
            unread_contacts,
            active_subscribers,
        ): (i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM blogs),
                (SELECT COUNT(*) FROM blogs WHERE published = true),
                (SELECT COUNT(*) FROM comments WHERE approved = false),
                (SELECT COUNT(*) FROM contacts WHERE status = 'UNREAD'),
                (SELECT COUNT(*) FROM newsletters WHERE active = true)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_users,
            total_blogs,
            published_blogs,
            pending_comments,
            unread_contacts,
            active_subscribers,
        })
    }
}
