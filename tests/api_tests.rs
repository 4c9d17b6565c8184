use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use site_backend::{
    AppConfig, AppState, MemoryRepository, create_router,
    credentials::issue_token,
    models::{NewUser, Role},
    repository::RepositoryState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;
use uuid::Uuid;

// --- Test Harness ---

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState {
            repo: Arc::new(MemoryRepository::new()) as RepositoryState,
            config: AppConfig::default(),
        };
        TestApp {
            router: create_router(state.clone()),
            state,
        }
    }

    async fn token_for(&self, email: &str, role: Role) -> String {
        let user = self
            .state
            .repo
            .create_user(NewUser {
                email: email.to_string(),
                name: None,
                password_hash: bcrypt::hash("secret1", 4).unwrap(),
                role,
            })
            .await
            .unwrap();
        issue_token(&self.state.config.jwt, user.id, 30).unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }
}

fn blog_body(slug: &str, published: bool) -> Value {
    json!({
        "title": "Launch notes",
        "content": "Everything that shipped this week.",
        "excerpt": "What shipped",
        "image": "launch.png",
        "slug": slug,
        "published": published
    })
}

// --- System ---

#[tokio::test]
async fn test_health_and_root() {
    let app = TestApp::new();

    let (status, _, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));

    let (status, _, body) = app.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "API is running");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new();
    let (_, headers, _) = app.send(Method::GET, "/health", None, None).await;
    let request_id = headers
        .get("x-request-id")
        .expect("x-request-id header")
        .to_str()
        .unwrap();
    assert!(Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new();
    let (status, _, body) = app
        .send(Method::GET, "/api-docs/openapi.json", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/blogs").is_some());
    assert!(body["paths"].get("/api/navbar/menu").is_some());
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/blogs")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();

    let (_, headers, _) = app.dispatch(request).await;
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
}

// --- Access Control ---

#[tokio::test]
async fn test_missing_token_is_401_with_challenge() {
    let app = TestApp::new();
    let (status, headers, body) = app.send(Method::GET, "/api/auth/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    assert_eq!(body, json!({ "detail": "Not authenticated" }));
}

#[tokio::test]
async fn test_user_token_on_admin_route_is_403() {
    let app = TestApp::new();
    let token = app.token_for("reader@site.test", Role::User).await;

    let (status, _, body) = app.send(Method::GET, "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Not enough permissions");
}

#[tokio::test]
async fn test_shared_path_splits_public_read_and_admin_write() {
    let app = TestApp::new();

    let (status, _, body) = app.send(Method::GET, "/api/features", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let feature = json!({ "title": "Speed", "description": "Fast", "icon": "bolt" });
    let (status, _, _) = app
        .send(Method::POST, "/api/features", None, Some(feature.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.token_for("admin@site.test", Role::Admin).await;
    let (status, _, created) = app
        .send(Method::POST, "/api/features", Some(&token), Some(feature))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Speed");
    assert_eq!(created["published"], true);
}

#[tokio::test]
async fn test_garbage_token_on_public_route_is_rejected() {
    let app = TestApp::new();
    let (status, _, body) = app
        .send(Method::GET, "/api/blogs", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Could not validate credentials");
}

// --- Error Envelope ---

#[tokio::test]
async fn test_malformed_id_is_400_with_detail() {
    let app = TestApp::new();
    let (status, _, body) = app
        .send(Method::GET, "/api/features/not-a-uuid", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_malformed_json_is_400_with_detail() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, _, body) = app.dispatch(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_duplicate_slug_is_400() {
    let app = TestApp::new();
    let token = app.token_for("admin@site.test", Role::Admin).await;

    let (status, _, _) = app
        .send(Method::POST, "/api/blogs", Some(&token), Some(blog_body("dupe", true)))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, body) = app
        .send(Method::POST, "/api/blogs", Some(&token), Some(blog_body("dupe", true)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Blog with this slug already exists");
}

// --- Blog Flow ---

#[tokio::test]
async fn test_slug_reads_count_views() {
    let app = TestApp::new();
    let token = app.token_for("admin@site.test", Role::Admin).await;

    let (status, _, created) = app
        .send(Method::POST, "/api/blogs", Some(&token), Some(blog_body("launch", true)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["views"], 0);

    let (_, _, first) = app.send(Method::GET, "/api/blogs/launch", None, None).await;
    assert_eq!(first["views"], 1);
    let (_, _, second) = app.send(Method::GET, "/api/blogs/launch", None, None).await;
    assert_eq!(second["views"], 2);

    // The editor view by id never counts.
    let uri = format!("/api/blogs/id/{}", created["id"].as_str().unwrap());
    let (status, _, by_id) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id["views"], 2);
}

#[tokio::test]
async fn test_draft_is_visible_to_admin_only() {
    let app = TestApp::new();
    let token = app.token_for("admin@site.test", Role::Admin).await;
    app.send(Method::POST, "/api/blogs", Some(&token), Some(blog_body("draft", false)))
        .await;

    let (status, _, body) = app.send(Method::GET, "/api/blogs/draft", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Blog not found");

    let (status, _, body) = app
        .send(Method::GET, "/api/blogs/draft", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["published"], false);

    let (_, _, page) = app.send(Method::GET, "/api/blogs", None, None).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_blog_tags_and_tag_filter() {
    let app = TestApp::new();
    let token = app.token_for("admin@site.test", Role::Admin).await;

    let (status, _, tag) = app
        .send(
            Method::POST,
            "/api/tags",
            Some(&token),
            Some(json!({ "name": "Rust", "slug": "rust" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut tagged = blog_body("tagged", true);
    tagged["tag_ids"] = json!([tag["id"]]);
    app.send(Method::POST, "/api/blogs", Some(&token), Some(tagged))
        .await;
    app.send(Method::POST, "/api/blogs", Some(&token), Some(blog_body("plain", true)))
        .await;

    let (_, _, page) = app.send(Method::GET, "/api/blogs?tag=rust", None, None).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["slug"], "tagged");
    assert_eq!(page["items"][0]["tags"][0]["name"], "Rust");

    let mut unknown = blog_body("ghost", true);
    unknown["tag_ids"] = json!([Uuid::new_v4()]);
    let (status, _, body) = app
        .send(Method::POST, "/api/blogs", Some(&token), Some(unknown))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Tag not found");
}

// --- Navigation Menu ---

#[tokio::test]
async fn test_public_menu_is_one_level_deep() {
    let app = TestApp::new();
    let token = app.token_for("admin@site.test", Role::Admin).await;

    let create = |body: Value| {
        let token = token.clone();
        let app = &app;
        async move {
            let (status, _, item) = app
                .send(Method::POST, "/api/navbar/menu", Some(&token), Some(body))
                .await;
            assert_eq!(status, StatusCode::CREATED);
            item
        }
    };

    let products = create(json!({ "title": "Products", "order": 1 })).await;
    let widgets = create(json!({
        "title": "Widgets", "path": "/widgets", "parent_id": products["id"]
    }))
    .await;
    create(json!({ "title": "Gadgets", "path": "/gadgets", "parent_id": widgets["id"] })).await;
    create(json!({ "title": "Home", "path": "/", "order": 0 })).await;

    let (status, _, tree) = app.send(Method::GET, "/api/navbar/menu", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let tree = tree.as_array().unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0]["title"], "Home");
    assert_eq!(tree[1]["title"], "Products");
    assert_eq!(tree[1]["children"].as_array().unwrap().len(), 1);
    assert_eq!(tree[1]["children"][0]["title"], "Widgets");
    assert!(tree[1]["children"][0].get("children").is_none());
}

// --- Live Server ---

async fn spawn_app() -> String {
    let state = AppState {
        repo: Arc::new(MemoryRepository::new()) as RepositoryState,
        config: AppConfig::default(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn test_register_login_profile_flow() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let registered: Value = client
        .post(format!("{address}/api/auth/register"))
        .json(&json!({ "email": "jane@site.test", "password": "secret1", "name": "Jane" }))
        .send()
        .await
        .expect("register request")
        .json()
        .await
        .unwrap();
    assert_eq!(registered["user"]["role"], "USER");
    assert_eq!(registered["token_type"], "bearer");

    let response = client
        .post(format!("{address}/api/auth/login"))
        .json(&json!({ "email": "jane@site.test", "password": "secret1" }))
        .send()
        .await
        .expect("login request");
    assert_eq!(response.status().as_u16(), 200);
    let login: Value = response.json().await.unwrap();
    let token = login["access_token"].as_str().unwrap().to_string();

    let me: Value = client
        .get(format!("{address}/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("me request")
        .json()
        .await
        .unwrap();
    assert_eq!(me["email"], "jane@site.test");

    let updated: Value = client
        .put(format!("{address}/api/users/profile"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Jane Doe" }))
        .send()
        .await
        .expect("profile request")
        .json()
        .await
        .unwrap();
    assert_eq!(updated["name"], "Jane Doe");
    assert_eq!(updated["email"], "jane@site.test");

    let response = client
        .post(format!("{address}/api/auth/admin/login"))
        .json(&json!({ "email": "jane@site.test", "password": "secret1" }))
        .send()
        .await
        .expect("admin login request");
    assert_eq!(response.status().as_u16(), 403);
}
