use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, put},
};

/// Authenticated Router Module
///
/// Routes for any signed-in account, USER or ADMIN. The router is wrapped in the
/// `require_user` route layer, so an anonymous request is rejected with 401 before any
/// handler runs. The resolved identity is cached on the request for the handler's own
/// `AuthUser` extractor.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/auth/me
        // Profile of the caller.
        .route("/api/auth/me", get(handlers::auth::me))
        // PUT /api/users/profile
        // Partial update of the caller's own name or email.
        .route("/api/users/profile", put(handlers::users::update_profile))
}
