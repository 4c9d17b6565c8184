use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{Repository, messages::*};
use crate::error::{AppError, AppResult};
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

/// MemoryRepository
///
/// In-process implementation of `Repository`, used by the test suites and for running the
/// API without a database. It mirrors the store's guarantees: natural keys are unique,
/// deletes cascade the way the foreign keys do, and multi-row mutations either apply
/// completely or not at all (they validate up front, or work on a draft copy that is
/// only swapped in on success).
///
/// The lock is never held across an `.await`.
#[derive(Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

#[derive(Default, Clone)]
struct State {
    users: Vec<UserRecord>,
    tags: Vec<Tag>,
    blogs: Vec<BlogRecord>,
    // (blog_id, tag_id)
    blog_tags: Vec<(Uuid, Uuid)>,
    comments: Vec<Comment>,
    features: Vec<Feature>,
    testimonials: Vec<Testimonial>,
    brands: Vec<Brand>,
    plans: Vec<PricingPlan>,
    contacts: Vec<Contact>,
    subscribers: Vec<Subscriber>,
    menu: Vec<MenuItem>,
    settings: Vec<SiteSetting>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave a half-applied mutation behind
        // (mutations are validated first), so a poisoned lock is still usable.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Newest first. Rows created in the same instant keep reverse insertion order.
fn newest_first<T: Clone>(items: &[T], created: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = items.iter().rev().cloned().collect();
    out.sort_by(|a, b| created(b).cmp(&created(a)));
    out
}

fn window<T>(items: Vec<T>, page: Pagination) -> Vec<T> {
    items
        .into_iter()
        .skip(page.skip as usize)
        .take(page.limit as usize)
        .collect()
}

fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Catalog rows share the listing rule: `order` ascending, then creation time ascending.
trait CatalogRow: Clone {
    fn order(&self) -> i32;
    fn created_at(&self) -> DateTime<Utc>;
    fn published(&self) -> bool;
    fn featured(&self) -> bool {
        false
    }
}

impl CatalogRow for Feature {
    fn order(&self) -> i32 {
        self.order
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn published(&self) -> bool {
        self.published
    }
}

impl CatalogRow for Testimonial {
    fn order(&self) -> i32 {
        self.order
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn published(&self) -> bool {
        self.published
    }
    fn featured(&self) -> bool {
        self.featured
    }
}

impl CatalogRow for Brand {
    fn order(&self) -> i32 {
        self.order
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn published(&self) -> bool {
        self.published
    }
}

impl CatalogRow for PricingPlan {
    fn order(&self) -> i32 {
        self.order
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn published(&self) -> bool {
        self.published
    }
}

fn catalog_listing<T: CatalogRow>(items: &[T], filter: CatalogFilter) -> Vec<T> {
    let mut out: Vec<T> = items
        .iter()
        .filter(|item| !filter.published_only || item.published())
        .filter(|item| !filter.featured_only || item.featured())
        .cloned()
        .collect();
    out.sort_by(|a, b| {
        a.order()
            .cmp(&b.order())
            .then(a.created_at().cmp(&b.created_at()))
    });
    out
}

fn menu_sorted(mut items: Vec<MenuItem>) -> Vec<MenuItem> {
    items.sort_by(|a, b| a.order.cmp(&b.order).then(a.created_at.cmp(&b.created_at)));
    items
}

impl State {
    fn public_user(&self, id: Uuid) -> AppResult<User> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .map(User::from)
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }

    fn tags_of(&self, blog_id: Uuid) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self
            .blog_tags
            .iter()
            .filter(|(b, _)| *b == blog_id)
            .filter_map(|(_, t)| self.tags.iter().find(|tag| tag.id == *t).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    fn hydrate(&self, record: &BlogRecord) -> AppResult<Blog> {
        let author = self.public_user(record.author_id)?;
        Ok(Blog::assemble(
            record.clone(),
            author,
            self.tags_of(record.id),
        ))
    }

    fn require_tags(&self, tag_ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        let unique = dedup_ids(tag_ids);
        if unique
            .iter()
            .all(|id| self.tags.iter().any(|tag| tag.id == *id))
        {
            Ok(unique)
        } else {
            Err(AppError::not_found(TAG_NOT_FOUND))
        }
    }

    fn blog_matches(&self, blog: &BlogRecord, filter: &BlogFilter) -> bool {
        if let Some(published) = filter.published {
            if blog.published != published {
                return false;
            }
        }
        if let Some(featured) = filter.featured {
            if blog.featured != featured {
                return false;
            }
        }
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            if !(contains_ci(&blog.title, &needle)
                || contains_ci(&blog.excerpt, &needle)
                || contains_ci(&blog.content, &needle))
            {
                return false;
            }
        }
        if let Some(slug) = &filter.tag {
            let tagged = self.tags_of(blog.id).iter().any(|tag| &tag.slug == slug);
            if !tagged {
                return false;
            }
        }
        true
    }

    /// Blogs in listing order: publish date descending, then creation time descending.
    fn blogs_in_listing_order(&self) -> Vec<BlogRecord> {
        let mut blogs: Vec<BlogRecord> = self.blogs.iter().rev().cloned().collect();
        blogs.sort_by(|a, b| {
            b.publish_date
                .cmp(&a.publish_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        blogs
    }

    fn remove_blogs(&mut self, ids: &HashSet<Uuid>) {
        self.blogs.retain(|b| !ids.contains(&b.id));
        self.comments.retain(|c| !ids.contains(&c.blog_id));
        self.blog_tags.retain(|(b, _)| !ids.contains(b));
    }

    fn menu_exists(&self, id: Uuid) -> bool {
        self.menu.iter().any(|m| m.id == id)
    }

    /// Validates `parent_id` as the new parent of `id`: it must exist and must not sit
    /// inside the subtree of `id`.
    fn check_menu_parent(&self, id: Uuid, parent_id: Uuid) -> AppResult<()> {
        if !self.menu_exists(parent_id) {
            return Err(AppError::not_found(PARENT_NOT_FOUND));
        }
        if self.menu_subtree(id).contains(&parent_id) {
            return Err(AppError::validation(PARENT_IS_DESCENDANT));
        }
        Ok(())
    }

    /// `id` plus every item below it, at any depth.
    fn menu_subtree(&self, id: Uuid) -> HashSet<Uuid> {
        let mut doomed = HashSet::from([id]);
        loop {
            let before = doomed.len();
            for item in &self.menu {
                if let Some(parent) = item.parent_id {
                    if doomed.contains(&parent) {
                        doomed.insert(item.id);
                    }
                }
            }
            if doomed.len() == before {
                return doomed;
            }
        }
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    // --- USERS ---

    async fn find_user(&self, id: Uuid) -> AppResult<Option<UserRecord>> {
        Ok(self.state().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self.state().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }
        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        state.users.push(record.clone());
        Ok(User::from(record))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let state = self.state();
        Ok(newest_first(&state.users, |u| u.created_at)
            .into_iter()
            .map(User::from)
            .collect())
    }

    async fn update_user(&self, id: Uuid, req: UpdateUserRequest) -> AppResult<User> {
        let mut state = self.state();
        if !state.users.iter().any(|u| u.id == id) {
            return Err(AppError::not_found(USER_NOT_FOUND));
        }
        if let Some(email) = &req.email {
            if state.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::conflict(EMAIL_TAKEN));
            }
        }
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;
        if let Some(name) = req.name {
            user.name = Some(name);
        }
        if let Some(email) = req.email {
            user.email = email;
        }
        user.updated_at = Utc::now();
        Ok(User::from(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state();
        if !state.users.iter().any(|u| u.id == id) {
            return Err(AppError::not_found(USER_NOT_FOUND));
        }
        let owned: HashSet<Uuid> = state
            .blogs
            .iter()
            .filter(|b| b.author_id == id)
            .map(|b| b.id)
            .collect();
        state.remove_blogs(&owned);
        state.users.retain(|u| u.id != id);
        Ok(())
    }

    // --- TAGS ---

    async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        let mut tags = self.state().tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn create_tag(&self, req: CreateTagRequest) -> AppResult<Tag> {
        let mut state = self.state();
        if state
            .tags
            .iter()
            .any(|t| t.name == req.name || t.slug == req.slug)
        {
            return Err(AppError::conflict(TAG_TAKEN));
        }
        let tag = Tag {
            id: Uuid::new_v4(),
            name: req.name,
            slug: req.slug,
            color: req.color.unwrap_or_else(|| DEFAULT_TAG_COLOR.to_string()),
        };
        state.tags.push(tag.clone());
        Ok(tag)
    }

    async fn update_tag(&self, id: Uuid, req: UpdateTagRequest) -> AppResult<Tag> {
        let mut state = self.state();
        if !state.tags.iter().any(|t| t.id == id) {
            return Err(AppError::not_found(TAG_NOT_FOUND));
        }
        let collides = state.tags.iter().any(|t| {
            t.id != id
                && (req.name.as_deref() == Some(t.name.as_str())
                    || req.slug.as_deref() == Some(t.slug.as_str()))
        });
        if collides {
            return Err(AppError::conflict(TAG_TAKEN));
        }
        let tag = state
            .tags
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found(TAG_NOT_FOUND))?;
        if let Some(name) = req.name {
            tag.name = name;
        }
        if let Some(slug) = req.slug {
            tag.slug = slug;
        }
        if let Some(color) = req.color {
            tag.color = color;
        }
        Ok(tag.clone())
    }

    async fn delete_tag(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state();
        if !state.tags.iter().any(|t| t.id == id) {
            return Err(AppError::not_found(TAG_NOT_FOUND));
        }
        state.tags.retain(|t| t.id != id);
        state.blog_tags.retain(|(_, t)| *t != id);
        Ok(())
    }

    // --- BLOGS ---

    async fn list_blogs(
        &self,
        filter: &BlogFilter,
        page: Pagination,
    ) -> AppResult<(Vec<BlogSummary>, i64)> {
        let state = self.state();
        let matching: Vec<BlogRecord> = state
            .blogs_in_listing_order()
            .into_iter()
            .filter(|b| state.blog_matches(b, filter))
            .collect();
        let total = matching.len() as i64;
        let items = window(matching, page)
            .iter()
            .map(|b| state.hydrate(b).map(BlogSummary::from))
            .collect::<AppResult<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn featured_blogs(&self, limit: i64) -> AppResult<Vec<BlogSummary>> {
        let state = self.state();
        state
            .blogs_in_listing_order()
            .iter()
            .filter(|b| b.published && b.featured)
            .take(limit.max(0) as usize)
            .map(|b| state.hydrate(b).map(BlogSummary::from))
            .collect()
    }

    async fn read_blog_by_slug(&self, slug: &str, include_unpublished: bool) -> AppResult<Blog> {
        let mut state = self.state();
        let record = state
            .blogs
            .iter_mut()
            .find(|b| b.slug == slug)
            .ok_or_else(|| AppError::not_found(BLOG_NOT_FOUND))?;
        if record.published {
            record.views += 1;
        } else if !include_unpublished {
            return Err(AppError::not_found(BLOG_NOT_FOUND));
        }
        let record = record.clone();
        state.hydrate(&record)
    }

    async fn get_blog(&self, id: Uuid) -> AppResult<Blog> {
        let state = self.state();
        let record = state
            .blogs
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::not_found(BLOG_NOT_FOUND))?;
        state.hydrate(record)
    }

    async fn create_blog(&self, author_id: Uuid, req: CreateBlogRequest) -> AppResult<Blog> {
        let mut state = self.state();
        if state.blogs.iter().any(|b| b.slug == req.slug) {
            return Err(AppError::conflict(SLUG_TAKEN));
        }
        if !state.users.iter().any(|u| u.id == author_id) {
            return Err(AppError::not_found(AUTHOR_NOT_FOUND));
        }
        let tag_ids = state.require_tags(&req.tag_ids)?;

        let now = Utc::now();
        let record = BlogRecord {
            id: Uuid::new_v4(),
            title: req.title,
            content: req.content,
            excerpt: req.excerpt,
            image: req.image,
            slug: req.slug,
            published: req.published,
            featured: req.featured,
            views: 0,
            publish_date: now,
            created_at: now,
            updated_at: now,
            author_id,
        };
        state.blogs.push(record.clone());
        for tag_id in tag_ids {
            state.blog_tags.push((record.id, tag_id));
        }
        state.hydrate(&record)
    }

    async fn update_blog(&self, id: Uuid, req: UpdateBlogRequest) -> AppResult<Blog> {
        let mut state = self.state();
        if !state.blogs.iter().any(|b| b.id == id) {
            return Err(AppError::not_found(BLOG_NOT_FOUND));
        }
        if let Some(slug) = &req.slug {
            if state.blogs.iter().any(|b| b.id != id && &b.slug == slug) {
                return Err(AppError::conflict(SLUG_TAKEN));
            }
        }
        let tag_ids = match &req.tag_ids {
            Some(ids) => Some(state.require_tags(ids)?),
            None => None,
        };

        let record = state
            .blogs
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::not_found(BLOG_NOT_FOUND))?;
        if let Some(title) = req.title {
            record.title = title;
        }
        if let Some(content) = req.content {
            record.content = content;
        }
        if let Some(excerpt) = req.excerpt {
            record.excerpt = excerpt;
        }
        if let Some(image) = req.image {
            record.image = image;
        }
        if let Some(slug) = req.slug {
            record.slug = slug;
        }
        if let Some(published) = req.published {
            record.published = published;
        }
        if let Some(featured) = req.featured {
            record.featured = featured;
        }
        record.updated_at = Utc::now();
        let record = record.clone();

        if let Some(tag_ids) = tag_ids {
            state.blog_tags.retain(|(b, _)| *b != id);
            for tag_id in tag_ids {
                state.blog_tags.push((id, tag_id));
            }
        }
        state.hydrate(&record)
    }

    async fn delete_blog(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state();
        if !state.blogs.iter().any(|b| b.id == id) {
            return Err(AppError::not_found(BLOG_NOT_FOUND));
        }
        state.remove_blogs(&HashSet::from([id]));
        Ok(())
    }

    // --- COMMENTS ---

    async fn list_comments(&self, blog_id: Uuid, approved_only: bool) -> AppResult<Vec<Comment>> {
        let state = self.state();
        let comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.blog_id == blog_id && (!approved_only || c.approved))
            .cloned()
            .collect();
        Ok(newest_first(&comments, |c| c.created_at))
    }

    async fn create_comment(
        &self,
        blog_id: Uuid,
        req: CreateCommentRequest,
    ) -> AppResult<Comment> {
        let mut state = self.state();
        if !state.blogs.iter().any(|b| b.id == blog_id) {
            return Err(AppError::not_found(BLOG_NOT_FOUND));
        }
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            content: req.content,
            author_name: req.author_name,
            author_email: req.author_email,
            approved: false,
            blog_id,
            created_at: now,
            updated_at: now,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn approve_comment(&self, id: Uuid) -> AppResult<Comment> {
        let mut state = self.state();
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found(COMMENT_NOT_FOUND))?;
        comment.approved = true;
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        if state.comments.len() == before {
            return Err(AppError::not_found(COMMENT_NOT_FOUND));
        }
        Ok(())
    }

    // --- FEATURES ---

    async fn list_features(&self, filter: CatalogFilter) -> AppResult<Vec<Feature>> {
        Ok(catalog_listing(&self.state().features, filter))
    }

    async fn get_feature(&self, id: Uuid) -> AppResult<Feature> {
        self.state()
            .features
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(FEATURE_NOT_FOUND))
    }

    async fn create_feature(&self, req: CreateFeatureRequest) -> AppResult<Feature> {
        let mut state = self.state();
        if state.features.iter().any(|f| f.title == req.title) {
            return Err(AppError::conflict(FEATURE_TAKEN));
        }
        let now = Utc::now();
        let feature = Feature {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            icon: req.icon,
            order: req.order,
            published: req.published,
            created_at: now,
            updated_at: now,
        };
        state.features.push(feature.clone());
        Ok(feature)
    }

    async fn update_feature(&self, id: Uuid, req: UpdateFeatureRequest) -> AppResult<Feature> {
        let mut state = self.state();
        if let Some(title) = &req.title {
            if state.features.iter().any(|f| f.id != id && &f.title == title) {
                return Err(AppError::conflict(FEATURE_TAKEN));
            }
        }
        let feature = state
            .features
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::not_found(FEATURE_NOT_FOUND))?;
        if let Some(title) = req.title {
            feature.title = title;
        }
        if let Some(description) = req.description {
            feature.description = description;
        }
        if let Some(icon) = req.icon {
            feature.icon = icon;
        }
        if let Some(order) = req.order {
            feature.order = order;
        }
        if let Some(published) = req.published {
            feature.published = published;
        }
        feature.updated_at = Utc::now();
        Ok(feature.clone())
    }

    async fn delete_feature(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state();
        let before = state.features.len();
        state.features.retain(|f| f.id != id);
        if state.features.len() == before {
            return Err(AppError::not_found(FEATURE_NOT_FOUND));
        }
        Ok(())
    }

    // --- TESTIMONIALS ---

    async fn list_testimonials(&self, filter: CatalogFilter) -> AppResult<Vec<Testimonial>> {
        Ok(catalog_listing(&self.state().testimonials, filter))
    }

    async fn get_testimonial(&self, id: Uuid) -> AppResult<Testimonial> {
        self.state()
            .testimonials
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(TESTIMONIAL_NOT_FOUND))
    }

    async fn create_testimonial(&self, req: CreateTestimonialRequest) -> AppResult<Testimonial> {
        let mut state = self.state();
        if state.testimonials.iter().any(|t| t.name == req.name) {
            return Err(AppError::conflict(TESTIMONIAL_TAKEN));
        }
        let now = Utc::now();
        let testimonial = Testimonial {
            id: Uuid::new_v4(),
            name: req.name,
            designation: req.designation,
            company: req.company,
            image: req.image,
            content: req.content,
            rating: req.rating,
            featured: req.featured,
            published: req.published,
            order: req.order,
            created_at: now,
            updated_at: now,
        };
        state.testimonials.push(testimonial.clone());
        Ok(testimonial)
    }

    async fn update_testimonial(
        &self,
        id: Uuid,
        req: UpdateTestimonialRequest,
    ) -> AppResult<Testimonial> {
        let mut state = self.state();
        if let Some(name) = &req.name {
            if state.testimonials.iter().any(|t| t.id != id && &t.name == name) {
                return Err(AppError::conflict(TESTIMONIAL_TAKEN));
            }
        }
        let testimonial = state
            .testimonials
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found(TESTIMONIAL_NOT_FOUND))?;
        if let Some(name) = req.name {
            testimonial.name = name;
        }
        if let Some(designation) = req.designation {
            testimonial.designation = designation;
        }
        if let Some(company) = req.company {
            testimonial.company = Some(company);
        }
        if let Some(image) = req.image {
            testimonial.image = image;
        }
        if let Some(content) = req.content {
            testimonial.content = content;
        }
        if let Some(rating) = req.rating {
            testimonial.rating = rating;
        }
        if let Some(featured) = req.featured {
            testimonial.featured = featured;
        }
        if let Some(published) = req.published {
            testimonial.published = published;
        }
        if let Some(order) = req.order {
            testimonial.order = order;
        }
        testimonial.updated_at = Utc::now();
        Ok(testimonial.clone())
    }

    async fn delete_testimonial(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state();
        let before = state.testimonials.len();
        state.testimonials.retain(|t| t.id != id);
        if state.testimonials.len() == before {
            return Err(AppError::not_found(TESTIMONIAL_NOT_FOUND));
        }
        Ok(())
    }

    // --- BRANDS ---

    async fn list_brands(&self, filter: CatalogFilter) -> AppResult<Vec<Brand>> {
        Ok(catalog_listing(&self.state().brands, filter))
    }

    async fn get_brand(&self, id: Uuid) -> AppResult<Brand> {
        self.state()
            .brands
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(BRAND_NOT_FOUND))
    }

    async fn create_brand(&self, req: CreateBrandRequest) -> AppResult<Brand> {
        let mut state = self.state();
        if state.brands.iter().any(|b| b.name == req.name) {
            return Err(AppError::conflict(BRAND_TAKEN));
        }
        let now = Utc::now();
        let brand = Brand {
            id: Uuid::new_v4(),
            name: req.name,
            logo: req.logo,
            website: req.website,
            order: req.order,
            published: req.published,
            created_at: now,
            updated_at: now,
        };
        state.brands.push(brand.clone());
        Ok(brand)
    }

    async fn update_brand(&self, id: Uuid, req: UpdateBrandRequest) -> AppResult<Brand> {
        let mut state = self.state();
        if let Some(name) = &req.name {
            if state.brands.iter().any(|b| b.id != id && &b.name == name) {
                return Err(AppError::conflict(BRAND_TAKEN));
            }
        }
        let brand = state
            .brands
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::not_found(BRAND_NOT_FOUND))?;
        if let Some(name) = req.name {
            brand.name = name;
        }
        if let Some(logo) = req.logo {
            brand.logo = logo;
        }
        if let Some(website) = req.website {
            brand.website = Some(website);
        }
        if let Some(order) = req.order {
            brand.order = order;
        }
        if let Some(published) = req.published {
            brand.published = published;
        }
        brand.updated_at = Utc::now();
        Ok(brand.clone())
    }

    async fn delete_brand(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state();
        let before = state.brands.len();
        state.brands.retain(|b| b.id != id);
        if state.brands.len() == before {
            return Err(AppError::not_found(BRAND_NOT_FOUND));
        }
        Ok(())
    }

    // --- PRICING PLANS ---

    async fn list_pricing_plans(&self, filter: CatalogFilter) -> AppResult<Vec<PricingPlan>> {
        Ok(catalog_listing(&self.state().plans, filter))
    }

    async fn get_pricing_plan(&self, id: Uuid) -> AppResult<PricingPlan> {
        self.state()
            .plans
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(PLAN_NOT_FOUND))
    }

    async fn create_pricing_plan(&self, req: CreatePricingPlanRequest) -> AppResult<PricingPlan> {
        let mut state = self.state();
        if state.plans.iter().any(|p| p.name == req.name) {
            return Err(AppError::conflict(PLAN_TAKEN));
        }
        let now = Utc::now();
        let plan = PricingPlan {
            id: Uuid::new_v4(),
            name: req.name,
            price: req.price,
            period: req.period,
            description: req.description,
            features: req.features,
            popular: req.popular,
            published: req.published,
            order: req.order,
            created_at: now,
            updated_at: now,
        };
        state.plans.push(plan.clone());
        Ok(plan)
    }

    async fn update_pricing_plan(
        &self,
        id: Uuid,
        req: UpdatePricingPlanRequest,
    ) -> AppResult<PricingPlan> {
        let mut state = self.state();
        if let Some(name) = &req.name {
            if state.plans.iter().any(|p| p.id != id && &p.name == name) {
                return Err(AppError::conflict(PLAN_TAKEN));
            }
        }
        let plan = state
            .plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(PLAN_NOT_FOUND))?;
        if let Some(name) = req.name {
            plan.name = name;
        }
        if let Some(price) = req.price {
            plan.price = price;
        }
        if let Some(period) = req.period {
            plan.period = period;
        }
        if let Some(description) = req.description {
            plan.description = Some(description);
        }
        if let Some(features) = req.features {
            plan.features = features;
        }
        if let Some(popular) = req.popular {
            plan.popular = popular;
        }
        if let Some(published) = req.published {
            plan.published = published;
        }
        if let Some(order) = req.order {
            plan.order = order;
        }
        plan.updated_at = Utc::now();
        Ok(plan.clone())
    }

    async fn delete_pricing_plan(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state();
        let before = state.plans.len();
        state.plans.retain(|p| p.id != id);
        if state.plans.len() == before {
            return Err(AppError::not_found(PLAN_NOT_FOUND));
        }
        Ok(())
    }

    // --- CONTACTS ---

    async fn create_contact(&self, req: CreateContactRequest) -> AppResult<Contact> {
        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4(),
            name: req.name,
            email: req.email,
            subject: req.subject,
            message: req.message,
            status: ContactStatus::Unread,
            created_at: now,
            updated_at: now,
        };
        self.state().contacts.push(contact.clone());
        Ok(contact)
    }

    async fn list_contacts(
        &self,
        filter: &ContactFilter,
        page: Pagination,
    ) -> AppResult<(Vec<Contact>, i64)> {
        let state = self.state();
        let needle = filter.search.as_ref().map(|s| s.to_lowercase());
        let matching: Vec<Contact> = newest_first(&state.contacts, |c| c.created_at)
            .into_iter()
            .filter(|c| filter.status.is_none_or(|status| c.status == status))
            .filter(|c| match &needle {
                Some(needle) => {
                    contains_ci(&c.name, needle)
                        || contains_ci(&c.email, needle)
                        || c.subject.as_deref().is_some_and(|s| contains_ci(s, needle))
                        || contains_ci(&c.message, needle)
                }
                None => true,
            })
            .collect();
        let total = matching.len() as i64;
        Ok((window(matching, page), total))
    }

    async fn get_contact(&self, id: Uuid) -> AppResult<Contact> {
        self.state()
            .contacts
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(CONTACT_NOT_FOUND))
    }

    async fn set_contact_status(&self, id: Uuid, status: ContactStatus) -> AppResult<Contact> {
        let mut state = self.state();
        let contact = state
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found(CONTACT_NOT_FOUND))?;
        contact.status = status;
        contact.updated_at = Utc::now();
        Ok(contact.clone())
    }

    async fn delete_contact(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state();
        let before = state.contacts.len();
        state.contacts.retain(|c| c.id != id);
        if state.contacts.len() == before {
            return Err(AppError::not_found(CONTACT_NOT_FOUND));
        }
        Ok(())
    }

    // --- NEWSLETTER ---

    async fn subscribe(&self, email: &str) -> AppResult<Subscription> {
        let mut state = self.state();
        let now = Utc::now();
        match state.subscribers.iter_mut().find(|s| s.email == email) {
            Some(existing) if existing.active => Ok(Subscription::AlreadyActive),
            Some(existing) => {
                existing.active = true;
                existing.updated_at = now;
                Ok(Subscription::Reactivated)
            }
            None => {
                state.subscribers.push(Subscriber {
                    id: Uuid::new_v4(),
                    email: email.to_string(),
                    active: true,
                    created_at: now,
                    updated_at: now,
                });
                Ok(Subscription::Created)
            }
        }
    }

    async fn unsubscribe(&self, email: &str) -> AppResult<Unsubscription> {
        let mut state = self.state();
        let subscriber = state
            .subscribers
            .iter_mut()
            .find(|s| s.email == email)
            .ok_or_else(|| AppError::not_found(EMAIL_NOT_SUBSCRIBED))?;
        if !subscriber.active {
            return Ok(Unsubscription::AlreadyInactive);
        }
        subscriber.active = false;
        subscriber.updated_at = Utc::now();
        Ok(Unsubscription::Deactivated)
    }

    async fn list_subscribers(
        &self,
        active_only: bool,
        page: Pagination,
    ) -> AppResult<(Vec<Subscriber>, i64)> {
        let state = self.state();
        let matching: Vec<Subscriber> = newest_first(&state.subscribers, |s| s.created_at)
            .into_iter()
            .filter(|s| !active_only || s.active)
            .collect();
        let total = matching.len() as i64;
        Ok((window(matching, page), total))
    }

    async fn delete_subscriber(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state();
        let before = state.subscribers.len();
        state.subscribers.retain(|s| s.id != id);
        if state.subscribers.len() == before {
            return Err(AppError::not_found(SUBSCRIBER_NOT_FOUND));
        }
        Ok(())
    }

    // --- NAVIGATION MENU ---

    async fn menu_tree(&self, include_unpublished: bool) -> AppResult<Vec<MenuNode>> {
        let state = self.state();
        let visible = |item: &&MenuItem| include_unpublished || item.published;

        let parents = menu_sorted(
            state
                .menu
                .iter()
                .filter(|m| m.parent_id.is_none())
                .filter(visible)
                .cloned()
                .collect(),
        );

        Ok(parents
            .into_iter()
            .map(|parent| {
                let children = menu_sorted(
                    state
                        .menu
                        .iter()
                        .filter(|m| m.parent_id == Some(parent.id))
                        .filter(visible)
                        .cloned()
                        .collect(),
                );
                MenuNode::new(parent, children)
            })
            .collect())
    }

    async fn create_menu_item(&self, req: CreateMenuItemRequest) -> AppResult<MenuItem> {
        let mut state = self.state();
        if let Some(parent_id) = req.parent_id {
            if !state.menu_exists(parent_id) {
                return Err(AppError::not_found(PARENT_NOT_FOUND));
            }
        }
        let now = Utc::now();
        let item = MenuItem {
            id: Uuid::new_v4(),
            title: req.title,
            path: req.path,
            new_tab: req.new_tab,
            order: req.order,
            published: req.published,
            parent_id: req.parent_id,
            created_at: now,
            updated_at: now,
        };
        state.menu.push(item.clone());
        Ok(item)
    }

    async fn update_menu_item(&self, id: Uuid, req: UpdateMenuItemRequest) -> AppResult<MenuItem> {
        if req.parent_id == Some(id) {
            return Err(AppError::validation(PARENT_IS_SELF));
        }
        let mut state = self.state();
        if !state.menu_exists(id) {
            return Err(AppError::not_found(MENU_ITEM_NOT_FOUND));
        }
        if let Some(parent_id) = req.parent_id {
            state.check_menu_parent(id, parent_id)?;
        }
        let item = state
            .menu
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::not_found(MENU_ITEM_NOT_FOUND))?;
        if let Some(title) = req.title {
            item.title = title;
        }
        if let Some(path) = req.path {
            item.path = Some(path);
        }
        if let Some(new_tab) = req.new_tab {
            item.new_tab = new_tab;
        }
        if let Some(order) = req.order {
            item.order = order;
        }
        if let Some(published) = req.published {
            item.published = published;
        }
        if let Some(parent_id) = req.parent_id {
            item.parent_id = Some(parent_id);
        }
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn delete_menu_item(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state();
        if !state.menu_exists(id) {
            return Err(AppError::not_found(MENU_ITEM_NOT_FOUND));
        }
        let doomed = state.menu_subtree(id);
        state.menu.retain(|m| !doomed.contains(&m.id));
        Ok(())
    }

    async fn reorder_menu(&self, entries: Vec<ReorderEntry>) -> AppResult<()> {
        let mut state = self.state();
        let mut draft = state.clone();
        let now = Utc::now();

        for entry in entries {
            if entry.parent_id == Some(entry.id) {
                return Err(AppError::validation(PARENT_IS_SELF));
            }
            if let Some(parent_id) = entry.parent_id {
                draft.check_menu_parent(entry.id, parent_id)?;
            }
            let item = draft
                .menu
                .iter_mut()
                .find(|m| m.id == entry.id)
                .ok_or_else(|| AppError::not_found(MENU_ITEM_NOT_FOUND))?;
            item.order = entry.order;
            item.parent_id = entry.parent_id;
            item.updated_at = now;
        }

        *state = draft;
        Ok(())
    }

    async fn bulk_menu_action(&self, ids: Vec<Uuid>, action: BulkAction) -> AppResult<u64> {
        let mut state = self.state();
        let unique = dedup_ids(&ids);
        if !unique.iter().all(|id| state.menu_exists(*id)) {
            return Err(AppError::not_found(MENU_ITEM_NOT_FOUND));
        }

        match action {
            BulkAction::Publish | BulkAction::Unpublish => {
                let published = action == BulkAction::Publish;
                let now = Utc::now();
                for item in state.menu.iter_mut().filter(|m| unique.contains(&m.id)) {
                    item.published = published;
                    item.updated_at = now;
                }
            }
            BulkAction::Delete => {
                let mut doomed = HashSet::new();
                for id in &unique {
                    doomed.extend(state.menu_subtree(*id));
                }
                state.menu.retain(|m| !doomed.contains(&m.id));
            }
        }
        Ok(unique.len() as u64)
    }

    // --- SITE SETTINGS ---

    async fn list_settings(&self) -> AppResult<Vec<SiteSetting>> {
        let mut settings = self.state().settings.clone();
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(settings)
    }

    async fn get_setting(&self, key: &str) -> AppResult<SiteSetting> {
        self.state()
            .settings
            .iter()
            .find(|s| s.key == key)
            .cloned()
            .ok_or_else(|| AppError::not_found(SETTING_NOT_FOUND))
    }

    async fn upsert_setting(&self, key: &str, req: UpsertSettingRequest) -> AppResult<SiteSetting> {
        let mut state = self.state();
        let now = Utc::now();
        match state.settings.iter_mut().find(|s| s.key == key) {
            Some(existing) => {
                let value_type = req.value_type.unwrap_or(existing.value_type);
                value_type.check(&req.value)?;
                existing.value = req.value;
                existing.value_type = value_type;
                if let Some(description) = req.description {
                    existing.description = Some(description);
                }
                existing.updated_at = now;
                Ok(existing.clone())
            }
            None => {
                let value_type = req.value_type.unwrap_or(SettingType::String);
                value_type.check(&req.value)?;
                let setting = SiteSetting {
                    id: Uuid::new_v4(),
                    key: key.to_string(),
                    value: req.value,
                    value_type,
                    description: req.description,
                    updated_at: now,
                };
                state.settings.push(setting.clone());
                Ok(setting)
            }
        }
    }

    async fn delete_setting(&self, key: &str) -> AppResult<()> {
        let mut state = self.state();
        let before = state.settings.len();
        state.settings.retain(|s| s.key != key);
        if state.settings.len() == before {
            return Err(AppError::not_found(SETTING_NOT_FOUND));
        }
        Ok(())
    }

    // --- ADMIN ---

    async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        let state = self.state();
        let count = |n: usize| n as i64;
        Ok(DashboardStats {
            total_users: count(state.users.len()),
            total_blogs: count(state.blogs.len()),
            published_blogs: count(state.blogs.iter().filter(|b| b.published).count()),
            pending_comments: count(state.comments.iter().filter(|c| !c.approved).count()),
            unread_contacts: count(
                state
                    .contacts
                    .iter()
                    .filter(|c| c.status == ContactStatus::Unread)
                    .count(),
            ),
            active_subscribers: count(state.subscribers.iter().filter(|s| s.active).count()),
        })
    }
}
