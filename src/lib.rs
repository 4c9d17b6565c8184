use axum::{
    Router,
    extract::FromRef,
    http::{HeaderName, HeaderValue},
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};

use credentials::hash_password_blocking;
use models::{NewUser, Role};

/// ApiDoc
///
/// OpenAPI document aggregated from every `#[utoipa::path]` handler and the schemas
/// they exchange. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root, handlers::health,
        handlers::auth::register, handlers::auth::login, handlers::auth::admin_login,
        handlers::auth::me, handlers::auth::logout, handlers::auth::create_user,
        handlers::users::list_users, handlers::users::get_user, handlers::users::update_user,
        handlers::users::delete_user, handlers::users::update_profile,
        handlers::blogs::list_blogs, handlers::blogs::featured_blogs,
        handlers::blogs::get_blog_by_slug, handlers::blogs::get_blog_by_id,
        handlers::blogs::create_blog, handlers::blogs::update_blog, handlers::blogs::delete_blog,
        handlers::blogs::list_comments, handlers::blogs::create_comment,
        handlers::blogs::approve_comment, handlers::blogs::delete_comment,
        handlers::blogs::list_tags, handlers::blogs::create_tag, handlers::blogs::update_tag,
        handlers::blogs::delete_tag,
        handlers::catalog::list_features, handlers::catalog::get_feature,
        handlers::catalog::create_feature, handlers::catalog::update_feature,
        handlers::catalog::delete_feature,
        handlers::catalog::list_testimonials, handlers::catalog::get_testimonial,
        handlers::catalog::create_testimonial, handlers::catalog::update_testimonial,
        handlers::catalog::delete_testimonial,
        handlers::catalog::list_brands, handlers::catalog::get_brand,
        handlers::catalog::create_brand, handlers::catalog::update_brand,
        handlers::catalog::delete_brand,
        handlers::catalog::list_pricing_plans, handlers::catalog::get_pricing_plan,
        handlers::catalog::create_pricing_plan, handlers::catalog::update_pricing_plan,
        handlers::catalog::delete_pricing_plan,
        handlers::contact::submit_contact, handlers::contact::list_contacts,
        handlers::contact::get_contact, handlers::contact::update_contact_status,
        handlers::contact::delete_contact,
        handlers::newsletter::subscribe, handlers::newsletter::unsubscribe,
        handlers::newsletter::list_subscribers, handlers::newsletter::delete_subscriber,
        handlers::menu::public_menu, handlers::menu::admin_menu,
        handlers::menu::create_menu_item, handlers::menu::update_menu_item,
        handlers::menu::delete_menu_item, handlers::menu::reorder_menu,
        handlers::menu::bulk_menu_action,
        handlers::settings::list_settings, handlers::settings::get_setting,
        handlers::settings::upsert_setting, handlers::settings::delete_setting,
        handlers::admin::dashboard_stats,
    ),
    components(
        schemas(
            models::MessageResponse, handlers::HealthResponse,
            models::Role, models::User, models::RegisterRequest, models::CreateUserRequest,
            models::LoginRequest, models::TokenResponse, models::UpdateUserRequest,
            models::DashboardStats,
            models::Tag, models::CreateTagRequest, models::UpdateTagRequest,
            models::Blog, models::BlogSummary, models::CreateBlogRequest,
            models::UpdateBlogRequest, models::Comment, models::CreateCommentRequest,
            models::Feature, models::CreateFeatureRequest, models::UpdateFeatureRequest,
            models::Testimonial, models::CreateTestimonialRequest,
            models::UpdateTestimonialRequest,
            models::Brand, models::CreateBrandRequest, models::UpdateBrandRequest,
            models::PricingPlan, models::CreatePricingPlanRequest,
            models::UpdatePricingPlanRequest,
            models::ContactStatus, models::Contact, models::CreateContactRequest,
            models::UpdateContactStatusRequest,
            models::Subscriber, models::NewsletterRequest,
            models::MenuItem, models::MenuNode, models::CreateMenuItemRequest,
            models::UpdateMenuItemRequest, models::ReorderEntry, models::BulkAction,
            models::BulkActionRequest,
            models::SettingType, models::SiteSetting, models::UpsertSettingRequest,
        )
    ),
    tags(
        (name = "system", description = "Liveness"),
        (name = "auth", description = "Registration, sign-in and account creation"),
        (name = "users", description = "Account management"),
        (name = "blogs", description = "Blog posts"),
        (name = "comments", description = "Reader comments and moderation"),
        (name = "tags", description = "Blog tags"),
        (name = "features", description = "Product features"),
        (name = "testimonials", description = "Customer testimonials"),
        (name = "brands", description = "Partner brands"),
        (name = "pricing", description = "Pricing plans"),
        (name = "contact", description = "Contact form inbox"),
        (name = "newsletter", description = "Newsletter subscriptions"),
        (name = "navbar", description = "Navigation menu"),
        (name = "settings", description = "Site settings"),
        (name = "admin", description = "Admin dashboard")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container for the application's services and configuration,
/// cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: every read and write goes through this trait object.
    pub repo: RepositoryState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Let extractors pull single components out of `AppState`.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// cors_layer
///
/// Allows the configured origins. A `*` entry opens the API to any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "ignoring malformed CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// create_router
///
/// Assembles the routing structure, applies the access layers and the observability
/// stack, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = cors_layer(&state.config.cors_origins);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public Routes: identity is optional and resolved per handler.
        .merge(public::public_routes())
        // Authenticated Routes: 401 before the handler without a valid identity.
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_user,
            )),
        )
        // Admin Routes: 401 without identity, 403 for non-admins.
        .merge(
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_admin,
            )),
        )
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: one span per request, tagged with the request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: echo x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the `http_request` span for `TraceLayer`, carrying method, URI and the
/// `x-request-id` so every log line of a request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}

/// bootstrap_admin
///
/// Ensures the configured first admin exists. An existing account with that email is
/// left untouched, whatever its role.
pub async fn bootstrap_admin(repo: &RepositoryState, config: &AppConfig) -> AppResult<()> {
    if repo
        .find_user_by_email(&config.first_admin_email)
        .await?
        .is_some()
    {
        tracing::debug!(email = %config.first_admin_email, "first admin already present");
        return Ok(());
    }

    let password_hash = hash_password_blocking(config.first_admin_password.clone()).await?;
    let admin = repo
        .create_user(NewUser {
            email: config.first_admin_email.clone(),
            name: Some("Administrator".to_string()),
            password_hash,
            role: Role::Admin,
        })
        .await?;

    tracing::info!(user_id = %admin.id, email = %admin.email, "first admin created");
    Ok(())
}
