use axum::{Json, extract::State, http::StatusCode};
use site_backend::{
    AppConfig, AppError, AppState, MemoryRepository, bootstrap_admin,
    auth::{AdminUser, AuthUser, OptionalUser},
    error::{AppJson, AppPath, AppQuery},
    handlers::{self, blogs, catalog, contact, menu, newsletter, settings, users},
    models::{
        BulkAction, BulkActionRequest, ContactStatus, CreateBlogRequest, CreateCommentRequest,
        CreateContactRequest, CreateFeatureRequest, CreateMenuItemRequest, LoginRequest,
        NewUser, NewsletterRequest, RegisterRequest, Role, SettingType,
        UpdateContactStatusRequest, UpsertSettingRequest, User,
    },
    repository::{Repository, RepositoryState},
};
use std::sync::Arc;
use tokio::test;
use uuid::Uuid;

// --- TEST UTILITIES ---

fn create_test_state() -> AppState {
    AppState {
        repo: Arc::new(MemoryRepository::new()) as RepositoryState,
        config: AppConfig::default(),
    }
}

// Minimum bcrypt cost keeps the suites fast.
async fn seed_user(state: &AppState, email: &str, password: &str, role: Role) -> User {
    state
        .repo
        .create_user(NewUser {
            email: email.to_string(),
            name: Some("Seeded".to_string()),
            password_hash: bcrypt::hash(password, 4).unwrap(),
            role,
        })
        .await
        .unwrap()
}

async fn seed_admin(state: &AppState) -> AdminUser {
    let admin = seed_user(state, "admin@site.test", "admin-pass", Role::Admin).await;
    AdminUser(AuthUser {
        id: admin.id,
        role: Role::Admin,
    })
}

fn as_viewer(admin: &AdminUser) -> OptionalUser {
    OptionalUser(Some(admin.0.clone()))
}

fn anonymous() -> OptionalUser {
    OptionalUser(None)
}

fn blog_request(slug: &str, published: bool) -> CreateBlogRequest {
    CreateBlogRequest {
        title: format!("Post {slug}"),
        content: "Long form content".to_string(),
        excerpt: "Short".to_string(),
        image: "cover.png".to_string(),
        slug: slug.to_string(),
        published,
        featured: false,
        tag_ids: vec![],
    }
}

fn blog_params(published: Option<bool>) -> blogs::BlogListParams {
    blogs::BlogListParams {
        skip: None,
        limit: None,
        search: None,
        published,
        featured: None,
        tag: None,
    }
}

fn newsletter_request(email: &str) -> AppJson<NewsletterRequest> {
    AppJson(NewsletterRequest {
        email: email.to_string(),
    })
}

// --- SYSTEM ---

#[test]
async fn test_root_and_health() {
    let Json(banner) = handlers::root().await;
    assert_eq!(banner.message, "API is running");

    let Json(health) = handlers::health().await;
    assert_eq!(health.status, "healthy");
}

// --- AUTH ---

#[test]
async fn test_register_always_creates_user_role() {
    let state = create_test_state();
    let payload = RegisterRequest {
        email: "new@site.test".to_string(),
        password: "secret1".to_string(),
        name: Some("New".to_string()),
    };

    let Json(token) = handlers::auth::register(State(state.clone()), AppJson(payload))
        .await
        .unwrap();

    assert_eq!(token.token_type, "bearer");
    assert_eq!(token.user.role, Role::User);
    assert!(!token.access_token.is_empty());
}

#[test]
async fn test_register_duplicate_email_conflicts() {
    let state = create_test_state();
    seed_user(&state, "taken@site.test", "secret1", Role::User).await;

    let payload = RegisterRequest {
        email: "taken@site.test".to_string(),
        password: "secret1".to_string(),
        name: None,
    };
    let err = handlers::auth::register(State(state), AppJson(payload))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let state = create_test_state();
    seed_user(&state, "reader@site.test", "right-pass", Role::User).await;

    let err = handlers::auth::login(
        State(state),
        AppJson(LoginRequest {
            email: "reader@site.test".to_string(),
            password: "wrong-pass".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Incorrect email or password"));
}

#[test]
async fn test_admin_login_requires_admin_role() {
    let state = create_test_state();
    seed_user(&state, "reader@site.test", "right-pass", Role::User).await;
    seed_user(&state, "boss@site.test", "boss-pass", Role::Admin).await;

    let err = handlers::auth::admin_login(
        State(state.clone()),
        AppJson(LoginRequest {
            email: "reader@site.test".to_string(),
            password: "right-pass".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(msg) if msg == "Admin access required"));

    let Json(token) = handlers::auth::admin_login(
        State(state),
        AppJson(LoginRequest {
            email: "boss@site.test".to_string(),
            password: "boss-pass".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(token.user.role, Role::Admin);
}

#[test]
async fn test_bootstrap_admin_is_idempotent() {
    let state = create_test_state();

    bootstrap_admin(&state.repo, &state.config).await.unwrap();
    bootstrap_admin(&state.repo, &state.config).await.unwrap();

    let all = state.repo.list_users().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].email, state.config.first_admin_email);
    assert_eq!(all[0].role, Role::Admin);
    assert_eq!(all[0].name.as_deref(), Some("Administrator"));
}

// --- USERS ---

#[test]
async fn test_admin_cannot_delete_self() {
    let state = create_test_state();
    let admin = seed_admin(&state).await;
    let own_id = admin.0.id;

    let err = users::delete_user(admin, State(state.clone()), AppPath(own_id))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert!(state.repo.find_user(own_id).await.unwrap().is_some());
}

#[test]
async fn test_delete_other_user() {
    let state = create_test_state();
    let admin = seed_admin(&state).await;
    let victim = seed_user(&state, "victim@site.test", "secret1", Role::User).await;

    let Json(msg) = users::delete_user(admin, State(state.clone()), AppPath(victim.id))
        .await
        .unwrap();
    assert_eq!(msg.message, "User deleted successfully");
    assert!(state.repo.find_user(victim.id).await.unwrap().is_none());
}

// --- BLOGS ---

#[test]
async fn test_list_blogs_forces_published_for_non_admins() {
    let state = create_test_state();
    let admin = seed_admin(&state).await;
    state
        .repo
        .create_blog(admin.0.id, blog_request("live", true))
        .await
        .unwrap();
    state
        .repo
        .create_blog(admin.0.id, blog_request("draft", false))
        .await
        .unwrap();

    // Anonymous callers asking for drafts still get the published list.
    let Json(page) = blogs::list_blogs(
        anonymous(),
        State(state.clone()),
        AppQuery(blog_params(Some(false))),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].slug, "live");

    let Json(drafts) = blogs::list_blogs(
        as_viewer(&admin),
        State(state),
        AppQuery(blog_params(Some(false))),
    )
    .await
    .unwrap();
    assert_eq!(drafts.total, 1);
    assert_eq!(drafts.items[0].slug, "draft");
}

#[test]
async fn test_list_blogs_rejects_bad_pagination() {
    let state = create_test_state();
    let mut params = blog_params(None);
    params.limit = Some(500);

    let err = blogs::list_blogs(anonymous(), State(state), AppQuery(params))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
async fn test_featured_limit_bounds() {
    let state = create_test_state();

    for limit in [0, 11] {
        let err = blogs::featured_blogs(
            State(state.clone()),
            AppQuery(blogs::FeaturedParams { limit: Some(limit) }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    let Json(items) = blogs::featured_blogs(
        State(state),
        AppQuery(blogs::FeaturedParams { limit: None }),
    )
    .await
    .unwrap();
    assert!(items.is_empty());
}

#[test]
async fn test_create_blog_returns_created_with_admin_as_author() {
    let state = create_test_state();
    let admin = seed_admin(&state).await;
    let admin_id = admin.0.id;

    let (status, Json(blog)) = blogs::create_blog(
        admin,
        State(state),
        AppJson(blog_request("hello-world", true)),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(blog.author.id, admin_id);
    assert_eq!(blog.views, 0);
}

#[test]
async fn test_slug_read_hides_drafts_from_visitors() {
    let state = create_test_state();
    let admin = seed_admin(&state).await;
    state
        .repo
        .create_blog(admin.0.id, blog_request("secret", false))
        .await
        .unwrap();

    let err = blogs::get_blog_by_slug(
        anonymous(),
        State(state.clone()),
        AppPath("secret".to_string()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let Json(blog) = blogs::get_blog_by_slug(
        as_viewer(&admin),
        State(state),
        AppPath("secret".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(blog.views, 0);
}

#[test]
async fn test_comments_are_moderated() {
    let state = create_test_state();
    let admin = seed_admin(&state).await;
    let blog = state
        .repo
        .create_blog(admin.0.id, blog_request("talk", true))
        .await
        .unwrap();

    let comment = CreateCommentRequest {
        content: "First!".to_string(),
        author_name: "Reader".to_string(),
        author_email: "reader@site.test".to_string(),
    };
    let (status, Json(created)) =
        blogs::create_comment(State(state.clone()), AppPath(blog.id), AppJson(comment))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert!(!created.approved);

    // Visitors cannot ask for unapproved comments.
    let Json(visible) = blogs::list_comments(
        anonymous(),
        State(state.clone()),
        AppPath(blog.id),
        AppQuery(blogs::CommentListParams {
            approved_only: Some(false),
        }),
    )
    .await
    .unwrap();
    assert!(visible.is_empty());

    let Json(pending) = blogs::list_comments(
        as_viewer(&admin),
        State(state.clone()),
        AppPath(blog.id),
        AppQuery(blogs::CommentListParams {
            approved_only: Some(false),
        }),
    )
    .await
    .unwrap();
    assert_eq!(pending.len(), 1);

    let Json(approved) = blogs::approve_comment(admin, State(state.clone()), AppPath(created.id))
        .await
        .unwrap();
    assert!(approved.approved);

    let Json(visible) = blogs::list_comments(
        anonymous(),
        State(state),
        AppPath(blog.id),
        AppQuery(blogs::CommentListParams {
            approved_only: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(visible.len(), 1);
}

#[test]
async fn test_comment_on_missing_blog_is_not_found() {
    let state = create_test_state();
    let comment = CreateCommentRequest {
        content: "Hello?".to_string(),
        author_name: "Reader".to_string(),
        author_email: "reader@site.test".to_string(),
    };

    let err = blogs::create_comment(State(state), AppPath(Uuid::new_v4()), AppJson(comment))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(msg) if msg == "Blog not found"));
}

// --- CATALOG ---

#[test]
async fn test_unpublished_feature_is_hidden_from_visitors() {
    let state = create_test_state();
    let admin = seed_admin(&state).await;
    let (_, Json(feature)) = catalog::create_feature(
        AdminUser(admin.0.clone()),
        State(state.clone()),
        AppJson(CreateFeatureRequest {
            title: "Hidden".to_string(),
            description: "Not yet".to_string(),
            icon: "eye".to_string(),
            order: 0,
            published: false,
        }),
    )
    .await
    .unwrap();

    let err = catalog::get_feature(anonymous(), State(state.clone()), AppPath(feature.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(msg) if msg == "Feature not found"));

    let Json(found) = catalog::get_feature(as_viewer(&admin), State(state.clone()), AppPath(feature.id))
        .await
        .unwrap();
    assert_eq!(found.id, feature.id);

    let Json(public) = catalog::list_features(
        anonymous(),
        State(state.clone()),
        AppQuery(catalog::CatalogParams {
            published_only: Some(false),
        }),
    )
    .await
    .unwrap();
    assert!(public.is_empty());

    let Json(everything) = catalog::list_features(
        as_viewer(&admin),
        State(state),
        AppQuery(catalog::CatalogParams {
            published_only: Some(false),
        }),
    )
    .await
    .unwrap();
    assert_eq!(everything.len(), 1);
}

// --- CONTACT ---

#[test]
async fn test_contact_submission_and_status_update() {
    let state = create_test_state();
    let admin = seed_admin(&state).await;

    let Json(ack) = contact::submit_contact(
        State(state.clone()),
        AppJson(CreateContactRequest {
            name: "Visitor".to_string(),
            email: "visitor@site.test".to_string(),
            subject: None,
            message: "Do you ship abroad?".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(
        ack.message,
        "Thank you for your message! We'll get back to you soon."
    );

    let stats = state.repo.dashboard_stats().await.unwrap();
    assert_eq!(stats.unread_contacts, 1);

    let (items, _) = state
        .repo
        .list_contacts(&Default::default(), Default::default())
        .await
        .unwrap();
    let id = items[0].id;

    let err = contact::update_contact_status(
        AdminUser(admin.0.clone()),
        State(state.clone()),
        AppPath(id),
        AppJson(UpdateContactStatusRequest {
            status: "deleted".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let Json(updated) = contact::update_contact_status(
        admin,
        State(state),
        AppPath(id),
        AppJson(UpdateContactStatusRequest {
            status: "replied".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.status, ContactStatus::Replied);
}

// --- NEWSLETTER ---

#[test]
async fn test_newsletter_lifecycle_messages() {
    let state = create_test_state();
    let email = "fan@site.test";

    let subscribe = |state: AppState| async move {
        newsletter::subscribe(State(state), newsletter_request(email))
            .await
            .map(|Json(msg)| msg.message)
    };
    let unsubscribe = |state: AppState| async move {
        newsletter::unsubscribe(State(state), newsletter_request(email))
            .await
            .map(|Json(msg)| msg.message)
    };

    assert_eq!(
        subscribe(state.clone()).await.unwrap(),
        "Thank you for subscribing to our newsletter!"
    );
    assert_eq!(
        subscribe(state.clone()).await.unwrap(),
        "You're already subscribed to our newsletter!"
    );
    assert_eq!(
        unsubscribe(state.clone()).await.unwrap(),
        "You have been unsubscribed from our newsletter."
    );
    assert_eq!(
        unsubscribe(state.clone()).await.unwrap(),
        "This email is already unsubscribed."
    );
    assert_eq!(
        subscribe(state.clone()).await.unwrap(),
        "Welcome back! Your subscription has been reactivated."
    );

    let stats = state.repo.dashboard_stats().await.unwrap();
    assert_eq!(stats.active_subscribers, 1);
}

#[test]
async fn test_unsubscribe_unknown_email_is_not_found() {
    let state = create_test_state();
    let err = newsletter::unsubscribe(State(state), newsletter_request("nobody@site.test"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
async fn test_subscribe_rejects_malformed_email() {
    let state = create_test_state();
    let err = newsletter::subscribe(State(state), newsletter_request("not-an-email"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

// --- NAVIGATION MENU ---

#[test]
async fn test_bulk_action_requires_ids() {
    let state = create_test_state();
    let admin = seed_admin(&state).await;

    let err = menu::bulk_menu_action(
        admin,
        State(state),
        AppJson(BulkActionRequest {
            item_ids: vec![],
            action: BulkAction::Publish,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(msg) if msg == "item_ids must not be empty"));
}

#[test]
async fn test_bulk_unpublish_reports_count() {
    let state = create_test_state();
    let admin = seed_admin(&state).await;

    let mut ids = Vec::new();
    for title in ["Home", "Blog"] {
        let (_, Json(item)) = menu::create_menu_item(
            AdminUser(admin.0.clone()),
            State(state.clone()),
            AppJson(CreateMenuItemRequest {
                title: title.to_string(),
                path: Some(format!("/{}", title.to_lowercase())),
                new_tab: false,
                order: 0,
                published: true,
                parent_id: None,
            }),
        )
        .await
        .unwrap();
        ids.push(item.id);
    }

    let Json(msg) = menu::bulk_menu_action(
        admin,
        State(state.clone()),
        AppJson(BulkActionRequest {
            item_ids: ids,
            action: BulkAction::Unpublish,
        }),
    )
    .await
    .unwrap();
    assert_eq!(msg.message, "Successfully unpublished 2 menu items");

    let Json(public) = menu::public_menu(State(state)).await.unwrap();
    assert!(public.is_empty());
}

// --- SETTINGS ---

#[test]
async fn test_upsert_setting_validates_key_and_value() {
    let state = create_test_state();
    let admin = seed_admin(&state).await;

    let err = settings::upsert_setting(
        AdminUser(admin.0.clone()),
        State(state.clone()),
        AppPath("bad key".to_string()),
        AppJson(UpsertSettingRequest {
            value: "x".to_string(),
            value_type: None,
            description: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = settings::upsert_setting(
        AdminUser(admin.0.clone()),
        State(state.clone()),
        AppPath("posts.per_page".to_string()),
        AppJson(UpsertSettingRequest {
            value: "ten".to_string(),
            value_type: Some(SettingType::Number),
            description: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let Json(stored) = settings::upsert_setting(
        admin,
        State(state.clone()),
        AppPath("posts.per_page".to_string()),
        AppJson(UpsertSettingRequest {
            value: "10".to_string(),
            value_type: Some(SettingType::Number),
            description: Some("Blog page size".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(stored.value_type, SettingType::Number);

    let Json(read) = settings::get_setting(State(state), AppPath("posts.per_page".to_string()))
        .await
        .unwrap();
    assert_eq!(read.value, "10");
}
