use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    Blog, BlogFilter, BlogSummary, BulkAction, CatalogFilter, Comment, Contact, ContactFilter,
    ContactStatus, CreateBlogRequest, CreateBrandRequest, CreateCommentRequest,
    CreateContactRequest, CreateFeatureRequest, CreateMenuItemRequest, CreatePricingPlanRequest,
    CreateTagRequest, CreateTestimonialRequest, DashboardStats, Feature, MenuItem, MenuNode,
    NewUser, Pagination, PricingPlan, ReorderEntry, SiteSetting, Subscriber, Subscription, Tag,
    Testimonial, Brand, Unsubscription, UpdateBlogRequest, UpdateBrandRequest,
    UpdateFeatureRequest, UpdateMenuItemRequest, UpdatePricingPlanRequest, UpdateTagRequest,
    UpdateTestimonialRequest, UpdateUserRequest, UpsertSettingRequest, User, UserRecord,
};

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

/// Repository Trait
///
/// Abstract contract for every persistence operation. Handlers only ever see
/// `Arc<dyn Repository>`, so the Postgres store and the in-process store are
/// interchangeable.
///
/// Failures are reported through [`crate::error::AppError`]: a missing row is `NotFound`,
/// a uniqueness violation is `Conflict`, anything else from the store is a 500. Every
/// method that touches more than one row runs in a single transaction; on error nothing
/// is left behind.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn find_user(&self, id: Uuid) -> AppResult<Option<UserRecord>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;
    async fn create_user(&self, user: NewUser) -> AppResult<User>;
    // Newest first.
    async fn list_users(&self) -> AppResult<Vec<User>>;
    async fn update_user(&self, id: Uuid, req: UpdateUserRequest) -> AppResult<User>;
    // Cascades to the user's blogs, their comments and tag links.
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    // --- Tags ---
    // Name ascending.
    async fn list_tags(&self) -> AppResult<Vec<Tag>>;
    async fn create_tag(&self, req: CreateTagRequest) -> AppResult<Tag>;
    async fn update_tag(&self, id: Uuid, req: UpdateTagRequest) -> AppResult<Tag>;
    // Removes association rows, never the blogs.
    async fn delete_tag(&self, id: Uuid) -> AppResult<()>;

    // --- Blogs ---
    /// Page of blogs matching `filter`, publish date descending, with the total count
    /// under the same filter.
    async fn list_blogs(
        &self,
        filter: &BlogFilter,
        page: Pagination,
    ) -> AppResult<(Vec<BlogSummary>, i64)>;
    async fn featured_blogs(&self, limit: i64) -> AppResult<Vec<BlogSummary>>;
    /// Reads a blog by slug. A published blog has its view counter bumped by one in the
    /// same transaction as the read. An unpublished blog is returned (unchanged) only when
    /// `include_unpublished` is set; otherwise it is `NotFound`.
    async fn read_blog_by_slug(&self, slug: &str, include_unpublished: bool) -> AppResult<Blog>;
    async fn get_blog(&self, id: Uuid) -> AppResult<Blog>;
    async fn create_blog(&self, author_id: Uuid, req: CreateBlogRequest) -> AppResult<Blog>;
    async fn update_blog(&self, id: Uuid, req: UpdateBlogRequest) -> AppResult<Blog>;
    async fn delete_blog(&self, id: Uuid) -> AppResult<()>;

    // --- Comments ---
    // Newest first.
    async fn list_comments(&self, blog_id: Uuid, approved_only: bool) -> AppResult<Vec<Comment>>;
    async fn create_comment(&self, blog_id: Uuid, req: CreateCommentRequest)
    -> AppResult<Comment>;
    async fn approve_comment(&self, id: Uuid) -> AppResult<Comment>;
    async fn delete_comment(&self, id: Uuid) -> AppResult<()>;

    // --- Catalog ---
    // Listings are `order` ascending, then creation time ascending.
    async fn list_features(&self, filter: CatalogFilter) -> AppResult<Vec<Feature>>;
    async fn get_feature(&self, id: Uuid) -> AppResult<Feature>;
    async fn create_feature(&self, req: CreateFeatureRequest) -> AppResult<Feature>;
    async fn update_feature(&self, id: Uuid, req: UpdateFeatureRequest) -> AppResult<Feature>;
    async fn delete_feature(&self, id: Uuid) -> AppResult<()>;

    async fn list_testimonials(&self, filter: CatalogFilter) -> AppResult<Vec<Testimonial>>;
    async fn get_testimonial(&self, id: Uuid) -> AppResult<Testimonial>;
    async fn create_testimonial(&self, req: CreateTestimonialRequest) -> AppResult<Testimonial>;
    async fn update_testimonial(
        &self,
        id: Uuid,
        req: UpdateTestimonialRequest,
    ) -> AppResult<Testimonial>;
    async fn delete_testimonial(&self, id: Uuid) -> AppResult<()>;

    async fn list_brands(&self, filter: CatalogFilter) -> AppResult<Vec<Brand>>;
    async fn get_brand(&self, id: Uuid) -> AppResult<Brand>;
    async fn create_brand(&self, req: CreateBrandRequest) -> AppResult<Brand>;
    async fn update_brand(&self, id: Uuid, req: UpdateBrandRequest) -> AppResult<Brand>;
    async fn delete_brand(&self, id: Uuid) -> AppResult<()>;

    async fn list_pricing_plans(&self, filter: CatalogFilter) -> AppResult<Vec<PricingPlan>>;
    async fn get_pricing_plan(&self, id: Uuid) -> AppResult<PricingPlan>;
    async fn create_pricing_plan(&self, req: CreatePricingPlanRequest) -> AppResult<PricingPlan>;
    async fn update_pricing_plan(
        &self,
        id: Uuid,
        req: UpdatePricingPlanRequest,
    ) -> AppResult<PricingPlan>;
    async fn delete_pricing_plan(&self, id: Uuid) -> AppResult<()>;

    // --- Contacts ---
    async fn create_contact(&self, req: CreateContactRequest) -> AppResult<Contact>;
    // Newest first.
    async fn list_contacts(
        &self,
        filter: &ContactFilter,
        page: Pagination,
    ) -> AppResult<(Vec<Contact>, i64)>;
    async fn get_contact(&self, id: Uuid) -> AppResult<Contact>;
    async fn set_contact_status(&self, id: Uuid, status: ContactStatus) -> AppResult<Contact>;
    async fn delete_contact(&self, id: Uuid) -> AppResult<()>;

    // --- Newsletter ---
    async fn subscribe(&self, email: &str) -> AppResult<Subscription>;
    /// `NotFound` only for an email that was never subscribed.
    async fn unsubscribe(&self, email: &str) -> AppResult<Unsubscription>;
    // Newest first.
    async fn list_subscribers(
        &self,
        active_only: bool,
        page: Pagination,
    ) -> AppResult<(Vec<Subscriber>, i64)>;
    async fn delete_subscriber(&self, id: Uuid) -> AppResult<()>;

    // --- Navigation Menu ---
    /// Top-level items with their direct children, both `order` ascending. Only one
    /// level of nesting is materialized.
    async fn menu_tree(&self, include_unpublished: bool) -> AppResult<Vec<MenuNode>>;
    async fn create_menu_item(&self, req: CreateMenuItemRequest) -> AppResult<MenuItem>;
    async fn update_menu_item(&self, id: Uuid, req: UpdateMenuItemRequest)
    -> AppResult<MenuItem>;
    // Removes the item together with every descendant.
    async fn delete_menu_item(&self, id: Uuid) -> AppResult<()>;
    async fn reorder_menu(&self, entries: Vec<ReorderEntry>) -> AppResult<()>;
    /// Returns the number of items affected.
    async fn bulk_menu_action(&self, ids: Vec<Uuid>, action: BulkAction) -> AppResult<u64>;

    // --- Site Settings ---
    // Key ascending.
    async fn list_settings(&self) -> AppResult<Vec<SiteSetting>>;
    async fn get_setting(&self, key: &str) -> AppResult<SiteSetting>;
    async fn upsert_setting(&self, key: &str, req: UpsertSettingRequest)
    -> AppResult<SiteSetting>;
    async fn delete_setting(&self, key: &str) -> AppResult<()>;

    // --- Admin ---
    async fn dashboard_stats(&self) -> AppResult<DashboardStats>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

// Messages shared by both implementations so clients see identical errors.
pub(crate) mod messages {
    pub const USER_NOT_FOUND: &str = "User not found";
    pub const EMAIL_TAKEN: &str = "Email already registered";
    pub const TAG_NOT_FOUND: &str = "Tag not found";
    pub const TAG_TAKEN: &str = "Tag with this name or slug already exists";
    pub const BLOG_NOT_FOUND: &str = "Blog not found";
    pub const SLUG_TAKEN: &str = "Blog with this slug already exists";
    pub const AUTHOR_NOT_FOUND: &str = "Author not found";
    pub const COMMENT_NOT_FOUND: &str = "Comment not found";
    pub const FEATURE_NOT_FOUND: &str = "Feature not found";
    pub const FEATURE_TAKEN: &str = "Feature with this title already exists";
    pub const TESTIMONIAL_NOT_FOUND: &str = "Testimonial not found";
    pub const TESTIMONIAL_TAKEN: &str = "Testimonial with this name already exists";
    pub const BRAND_NOT_FOUND: &str = "Brand not found";
    pub const BRAND_TAKEN: &str = "Brand with this name already exists";
    pub const PLAN_NOT_FOUND: &str = "Pricing plan not found";
    pub const PLAN_TAKEN: &str = "Pricing plan with this name already exists";
    pub const CONTACT_NOT_FOUND: &str = "Contact not found";
    pub const SUBSCRIBER_NOT_FOUND: &str = "Subscriber not found";
    pub const EMAIL_NOT_SUBSCRIBED: &str = "Email not found in our subscription list";
    pub const MENU_ITEM_NOT_FOUND: &str = "Menu item not found";
    pub const PARENT_NOT_FOUND: &str = "Parent menu item not found";
    pub const PARENT_IS_SELF: &str = "A menu item cannot be its own parent";
    pub const PARENT_IS_DESCENDANT: &str = "A menu item cannot be moved under its own descendant";
    pub const SETTING_NOT_FOUND: &str = "Setting not found";
}
