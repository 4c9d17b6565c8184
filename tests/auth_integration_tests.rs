use axum::{
    extract::FromRequestParts,
    http::{Request, header, request::Parts},
};
use site_backend::{
    AppConfig, AppError, AppState, MemoryRepository,
    auth::{AdminUser, AuthUser, OptionalUser},
    credentials::issue_token,
    models::{NewUser, Role, User},
    repository::{Repository, RepositoryState},
};
use std::sync::Arc;
use uuid::Uuid;

// --- Test Helpers ---

fn test_state() -> AppState {
    AppState {
        repo: Arc::new(MemoryRepository::new()) as RepositoryState,
        config: AppConfig::default(),
    }
}

async fn seed_user(state: &AppState, email: &str, role: Role) -> User {
    state
        .repo
        .create_user(NewUser {
            email: email.to_string(),
            name: None,
            password_hash: "unused".to_string(),
            role,
        })
        .await
        .expect("seed user")
}

fn token_for(state: &AppState, id: Uuid) -> String {
    issue_token(&state.config.jwt, id, 30).expect("sign token")
}

fn parts_with(authorization: Option<&str>) -> Parts {
    let mut builder = Request::builder().uri("/api/auth/me");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(()).unwrap().into_parts().0
}

fn unauthorized_message(err: AppError) -> String {
    match err {
        AppError::Unauthorized(msg) => msg,
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

// --- AuthUser ---

#[tokio::test]
async fn test_missing_header_is_not_authenticated() {
    let state = test_state();
    let mut parts = parts_with(None);

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(unauthorized_message(err), "Not authenticated");
}

#[tokio::test]
async fn test_valid_token_resolves_identity() {
    let state = test_state();
    let user = seed_user(&state, "reader@example.com", Role::User).await;
    let header_value = format!("Bearer {}", token_for(&state, user.id));
    let mut parts = parts_with(Some(&header_value));

    let auth = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .expect("valid token");
    assert_eq!(auth.id, user.id);
    assert_eq!(auth.role, Role::User);
    assert!(!auth.is_admin());
}

#[tokio::test]
async fn test_non_bearer_scheme_is_rejected() {
    let state = test_state();
    let user = seed_user(&state, "reader@example.com", Role::User).await;
    let header_value = format!("Basic {}", token_for(&state, user.id));
    let mut parts = parts_with(Some(&header_value));

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(unauthorized_message(err), "Could not validate credentials");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let state = test_state();
    let mut parts = parts_with(Some("Bearer not.a.jwt"));

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(unauthorized_message(err), "Could not validate credentials");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let state = test_state();
    let user = seed_user(&state, "reader@example.com", Role::User).await;
    let expired = issue_token(&state.config.jwt, user.id, -5).unwrap();
    let header_value = format!("Bearer {expired}");
    let mut parts = parts_with(Some(&header_value));

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(unauthorized_message(err), "Token has expired");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let state = test_state();
    let user = seed_user(&state, "reader@example.com", Role::User).await;
    let mut foreign = state.config.jwt.clone();
    foreign.secret = "another-service-secret".to_string();
    let header_value = format!("Bearer {}", issue_token(&foreign, user.id, 30).unwrap());
    let mut parts = parts_with(Some(&header_value));

    assert!(
        AuthUser::from_request_parts(&mut parts, &state)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_deleted_user_loses_access() {
    let state = test_state();
    let user = seed_user(&state, "gone@example.com", Role::User).await;
    let token = token_for(&state, user.id);
    state.repo.delete_user(user.id).await.unwrap();

    let header_value = format!("Bearer {token}");
    let mut parts = parts_with(Some(&header_value));
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(unauthorized_message(err), "Could not validate credentials");
}

#[tokio::test]
async fn test_identity_is_cached_on_the_request() {
    let state = test_state();
    let user = seed_user(&state, "reader@example.com", Role::User).await;
    let header_value = format!("Bearer {}", token_for(&state, user.id));
    let mut parts = parts_with(Some(&header_value));

    AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();
    let cached = parts.extensions.get::<AuthUser>().expect("cached identity");
    assert_eq!(cached.id, user.id);
}

// --- OptionalUser ---

#[tokio::test]
async fn test_optional_user_is_none_without_header() {
    let state = test_state();
    let mut parts = parts_with(None);

    let viewer = OptionalUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();
    assert!(viewer.0.is_none());
    assert!(!viewer.is_admin());
}

#[tokio::test]
async fn test_optional_user_still_rejects_bad_token() {
    let state = test_state();
    let mut parts = parts_with(Some("Bearer broken"));

    assert!(
        OptionalUser::from_request_parts(&mut parts, &state)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_optional_user_reports_admin() {
    let state = test_state();
    let admin = seed_user(&state, "admin@example.com", Role::Admin).await;
    let header_value = format!("Bearer {}", token_for(&state, admin.id));
    let mut parts = parts_with(Some(&header_value));

    let viewer = OptionalUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();
    assert!(viewer.is_admin());
}

// --- AdminUser ---

#[tokio::test]
async fn test_admin_extractor_accepts_admin() {
    let state = test_state();
    let admin = seed_user(&state, "admin@example.com", Role::Admin).await;
    let header_value = format!("Bearer {}", token_for(&state, admin.id));
    let mut parts = parts_with(Some(&header_value));

    let AdminUser(identity) = AdminUser::from_request_parts(&mut parts, &state)
        .await
        .expect("admin");
    assert_eq!(identity.id, admin.id);
}

#[tokio::test]
async fn test_admin_extractor_forbids_regular_user() {
    let state = test_state();
    let user = seed_user(&state, "reader@example.com", Role::User).await;
    let header_value = format!("Bearer {}", token_for(&state, user.id));
    let mut parts = parts_with(Some(&header_value));

    let err = AdminUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(msg) if msg == "Not enough permissions"));
}

#[tokio::test]
async fn test_admin_extractor_requires_identity() {
    let state = test_state();
    let mut parts = parts_with(None);

    let err = AdminUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}
