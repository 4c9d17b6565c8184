use axum::{
    extract::{FromRef, FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    credentials::verify_token,
    error::AppError,
    models::Role,
    repository::RepositoryState,
};

/// AuthUser Extractor Result
///
/// The resolved identity of an authenticated request. Handlers use it to read the
/// caller's id and role; it is never built from anything but a verified token and a
/// live user row.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// OptionalUser
///
/// Weakest resolution strength: `None` when the request carries no `Authorization`
/// header. A header that is present but invalid is still rejected with 401.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthUser>);

impl OptionalUser {
    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(AuthUser::is_admin)
    }
}

/// AdminUser
///
/// Strongest resolution strength: an `AuthUser` whose role is ADMIN, otherwise 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

/// resolve_identity
///
/// Shared by all three extractors:
/// 1. Cache: a route-layer middleware may already have resolved the caller for this request.
/// 2. Token Extraction: no header means anonymous; anything but `Bearer <token>` is rejected.
/// 3. Token Verification: signature, algorithm and expiry.
/// 4. DB Lookup: the subject must still exist, so deleted users lose access immediately.
///
/// The result is stored in the request extensions for the next extractor in line.
async fn resolve_identity<S>(parts: &mut Parts, state: &S) -> Result<Option<AuthUser>, AppError>
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    if let Some(cached) = parts.extensions.get::<AuthUser>() {
        return Ok(Some(cached.clone()));
    }

    let Some(raw) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let token = raw
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".to_string()))?;

    let config = AppConfig::from_ref(state);
    let user_id = verify_token(&config.jwt, token)?;

    let repo = RepositoryState::from_ref(state);
    let user = repo
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".to_string()))?;

    let identity = AuthUser {
        id: user.id,
        role: user.role,
    };
    parts.extensions.insert(identity.clone());
    Ok(Some(identity))
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        resolve_identity(parts, state)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(resolve_identity(parts, state).await?))
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("Not enough permissions".to_string()));
        }
        Ok(AdminUser(user))
    }
}

/// require_user
///
/// Route-layer guard for the authenticated router. Rejection happens in the extractor,
/// before the handler runs.
pub async fn require_user(_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// require_admin
///
/// Route-layer guard for the admin router: 401 without a valid identity, 403 for a
/// non-admin one.
pub async fn require_admin(_admin: AdminUser, request: Request, next: Next) -> Response {
    next.run(request).await
}
