use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    auth::{AdminUser, AuthUser},
    credentials::{hash_password_blocking, issue_token, verify_password_blocking},
    error::{AppError, AppJson, AppResult},
    models::{
        CreateUserRequest, LoginRequest, MessageResponse, NewUser, RegisterRequest, Role,
        TokenResponse, User,
    },
};

const BAD_CREDENTIALS: &str = "Incorrect email or password";

/// Verifies an email/password pair and returns the matching public user.
///
/// Unknown email and wrong password are indistinguishable to the caller.
async fn authenticate(state: &AppState, payload: LoginRequest) -> AppResult<User> {
    let record = state
        .repo
        .find_user_by_email(&payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    if !verify_password_blocking(payload.password, record.password_hash.clone()).await {
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }
    Ok(User::from(record))
}

fn token_for(state: &AppState, user: User) -> AppResult<TokenResponse> {
    let jwt = &state.config.jwt;
    let token = issue_token(jwt, user.id, jwt.expire_minutes)?;
    Ok(TokenResponse::bearer(token, user))
}

/// register
///
/// [Public Route] Self-registration. The new account always gets the USER role;
/// admins are created through `create_user` or the startup bootstrap.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered and signed in", body = TokenResponse),
        (status = 400, description = "Invalid input or email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<Json<TokenResponse>> {
    payload.validate()?;

    let password_hash = hash_password_blocking(payload.password).await?;
    let user = state
        .repo
        .create_user(NewUser {
            email: payload.email,
            name: payload.name,
            password_hash,
            role: Role::User,
        })
        .await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(Json(token_for(&state, user)?))
}

/// login
///
/// [Public Route] Exchanges credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Incorrect email or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = authenticate(&state, payload).await?;
    Ok(Json(token_for(&state, user)?))
}

/// admin_login
///
/// [Public Route] Same as `login`, but only admins receive a token.
#[utoipa::path(
    post,
    path = "/api/auth/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Incorrect email or password"),
        (status = 403, description = "Not an admin")
    ),
    tag = "auth"
)]
pub async fn admin_login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = authenticate(&state, payload).await?;
    if !user.role.is_admin() {
        tracing::warn!(user_id = %user.id, "non-admin attempted admin login");
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(Json(token_for(&state, user)?))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    ),
    tag = "auth"
)]
pub async fn me(AuthUser { id, .. }: AuthUser, State(state): State<AppState>) -> AppResult<Json<User>> {
    let record = state
        .repo
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".to_string()))?;
    Ok(Json(User::from(record)))
}

/// logout
///
/// [Public Route] Tokens are stateless; the client discards its copy.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Logged out", body = MessageResponse)),
    tag = "auth"
)]
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Successfully logged out"))
}

/// create_user
///
/// [Admin Route] Creates an account with a caller-chosen role (USER by default).
#[utoipa::path(
    post,
    path = "/api/auth/admin/create-user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = User),
        (status = 400, description = "Invalid input or email already registered"),
        (status = 403, description = "Not an admin")
    ),
    tag = "auth"
)]
pub async fn create_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    payload.validate()?;

    let password_hash = hash_password_blocking(payload.password).await?;
    let user = state
        .repo
        .create_user(NewUser {
            email: payload.email,
            name: payload.name,
            password_hash,
            role: payload.role.unwrap_or_default(),
        })
        .await?;

    tracing::info!(admin_id = %admin.id, user_id = %user.id, role = ?user.role, "user created by admin");
    Ok((StatusCode::CREATED, Json(user)))
}
