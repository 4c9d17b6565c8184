use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

use handlers::{auth, blogs, catalog, contact, menu, newsletter, settings};

/// Public Router Module
///
/// Endpoints reachable without a token. Handlers that take `OptionalUser` serve drafts
/// and unpublished rows to admins, and the published subset to everyone else. A
/// malformed or expired token is still rejected even on these routes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET / and GET /health
        // Banner and liveness probe.
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // --- Authentication ---
        // POST /api/auth/register
        // Self-registration; always creates a USER.
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        // POST /api/auth/admin/login
        // Credential check plus an ADMIN role check.
        .route("/api/auth/admin/login", post(auth::admin_login))
        .route("/api/auth/logout", post(auth::logout))
        // --- Blogs ---
        // GET /api/blogs?skip=&limit=&search=&published=&featured=&tag=
        .route("/api/blogs", get(blogs::list_blogs))
        .route("/api/blogs/featured", get(blogs::featured_blogs))
        // GET /api/blogs/{slug}
        // Detail by slug; counts a view for published posts.
        .route("/api/blogs/{id}", get(blogs::get_blog_by_slug))
        // GET/POST /api/blogs/{id}/comments
        // Reading shows approved comments; posting queues a comment for moderation.
        .route(
            "/api/blogs/{id}/comments",
            get(blogs::list_comments).post(blogs::create_comment),
        )
        .route("/api/tags", get(blogs::list_tags))
        // --- Catalog ---
        .route("/api/features", get(catalog::list_features))
        .route("/api/features/{id}", get(catalog::get_feature))
        .route("/api/testimonials", get(catalog::list_testimonials))
        .route("/api/testimonials/{id}", get(catalog::get_testimonial))
        .route("/api/brands", get(catalog::list_brands))
        .route("/api/brands/{id}", get(catalog::get_brand))
        .route("/api/pricing", get(catalog::list_pricing_plans))
        .route("/api/pricing/{id}", get(catalog::get_pricing_plan))
        // --- Visitor Input ---
        .route("/api/contact", post(contact::submit_contact))
        .route("/api/newsletter/subscribe", post(newsletter::subscribe))
        .route("/api/newsletter/unsubscribe", post(newsletter::unsubscribe))
        // --- Site Chrome ---
        // GET /api/navbar/menu
        // One-level tree of published items.
        .route("/api/navbar/menu", get(menu::public_menu))
        .route("/api/settings", get(settings::list_settings))
        .route("/api/settings/{key}", get(settings::get_setting))
}
