use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use handlers::{admin, auth, blogs, catalog, contact, menu, newsletter, settings, users};

/// Admin Router Module
///
/// Every mutation of site content, plus moderation and account management.
///
/// Access Control:
/// The router is wrapped in the `require_admin` route layer: 401 without a valid
/// identity, 403 for a non-admin one. Handlers also take `AdminUser`, so a handler
/// mounted here by mistake on a weaker router still refuses non-admins.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/admin/stats
        // Dashboard counters.
        .route("/api/admin/stats", get(admin::dashboard_stats))
        // POST /api/auth/admin/create-user
        // Account creation with an explicit role.
        .route("/api/auth/admin/create-user", post(auth::create_user))
        // --- Users ---
        .route("/api/users", get(users::list_users))
        // DELETE /api/users/{id}
        // Cascades to the user's blogs. Self-delete is refused.
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // --- Blogs ---
        .route("/api/blogs", post(blogs::create_blog))
        .route(
            "/api/blogs/{id}",
            put(blogs::update_blog).delete(blogs::delete_blog),
        )
        // GET /api/blogs/id/{id}
        // Detail by primary key for the editor; never counts a view.
        .route("/api/blogs/id/{id}", get(blogs::get_blog_by_id))
        // --- Comment Moderation ---
        .route(
            "/api/blogs/comments/{id}/approve",
            put(blogs::approve_comment),
        )
        .route("/api/blogs/comments/{id}", delete(blogs::delete_comment))
        // --- Tags ---
        .route("/api/tags", post(blogs::create_tag))
        .route(
            "/api/tags/{id}",
            put(blogs::update_tag).delete(blogs::delete_tag),
        )
        // --- Catalog ---
        .route("/api/features", post(catalog::create_feature))
        .route(
            "/api/features/{id}",
            put(catalog::update_feature).delete(catalog::delete_feature),
        )
        .route("/api/testimonials", post(catalog::create_testimonial))
        .route(
            "/api/testimonials/{id}",
            put(catalog::update_testimonial).delete(catalog::delete_testimonial),
        )
        .route("/api/brands", post(catalog::create_brand))
        .route(
            "/api/brands/{id}",
            put(catalog::update_brand).delete(catalog::delete_brand),
        )
        .route("/api/pricing", post(catalog::create_pricing_plan))
        .route(
            "/api/pricing/{id}",
            put(catalog::update_pricing_plan).delete(catalog::delete_pricing_plan),
        )
        // --- Contact Inbox ---
        // GET /api/contact?status=&search=&skip=&limit=
        .route("/api/contact", get(contact::list_contacts))
        .route(
            "/api/contact/{id}",
            get(contact::get_contact).delete(contact::delete_contact),
        )
        .route(
            "/api/contact/{id}/status",
            put(contact::update_contact_status),
        )
        // --- Newsletter ---
        .route(
            "/api/newsletter/subscribers",
            get(newsletter::list_subscribers),
        )
        .route(
            "/api/newsletter/subscribers/{id}",
            delete(newsletter::delete_subscriber),
        )
        // --- Navigation Menu ---
        .route("/api/navbar/menu", post(menu::create_menu_item))
        .route(
            "/api/navbar/menu/{id}",
            put(menu::update_menu_item).delete(menu::delete_menu_item),
        )
        // GET /api/navbar/admin/menu?include_unpublished=
        .route("/api/navbar/admin/menu", get(menu::admin_menu))
        // POST /api/navbar/admin/menu/reorder
        // All-or-nothing batch of {id, order, parent_id}.
        .route("/api/navbar/admin/menu/reorder", post(menu::reorder_menu))
        .route(
            "/api/navbar/admin/menu/bulk-action",
            post(menu::bulk_menu_action),
        )
        // --- Site Settings ---
        .route(
            "/api/settings/{key}",
            put(settings::upsert_setting).delete(settings::delete_setting),
        )
}
