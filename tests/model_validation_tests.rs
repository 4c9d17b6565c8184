use serde_json::json;
use site_backend::models::{
    BulkAction, BulkActionRequest, ContactStatus, CreateBlogRequest, CreateCommentRequest,
    CreateFeatureRequest, CreateMenuItemRequest, CreatePricingPlanRequest,
    CreateTestimonialRequest, MenuItem, MenuNode, Page, Pagination, RegisterRequest, Role,
    SettingType, SiteSetting, UpdateBlogRequest, UpsertSettingRequest,
};
use uuid::Uuid;

// --- Serde Contract ---

#[test]
fn test_role_serializes_uppercase() {
    assert_eq!(serde_json::to_value(Role::Admin).unwrap(), json!("ADMIN"));
    let role: Role = serde_json::from_value(json!("USER")).unwrap();
    assert_eq!(role, Role::User);
    assert!(serde_json::from_value::<Role>(json!("admin")).is_err());
}

#[test]
fn test_setting_type_field_is_named_type() {
    let setting = SiteSetting {
        id: Uuid::new_v4(),
        key: "site.title".to_string(),
        value: "Acme".to_string(),
        value_type: SettingType::String,
        description: None,
        updated_at: chrono::Utc::now(),
    };
    let value = serde_json::to_value(&setting).unwrap();
    assert_eq!(value["type"], json!("string"));
    assert!(value.get("value_type").is_none());

    let req: UpsertSettingRequest =
        serde_json::from_value(json!({ "value": "3", "type": "number" })).unwrap();
    assert_eq!(req.value_type, Some(SettingType::Number));
}

#[test]
fn test_catalog_and_menu_defaults() {
    let feature: CreateFeatureRequest = serde_json::from_value(json!({
        "title": "Fast", "description": "Very fast", "icon": "bolt"
    }))
    .unwrap();
    assert!(feature.published);
    assert_eq!(feature.order, 0);

    let testimonial: CreateTestimonialRequest = serde_json::from_value(json!({
        "name": "Ann", "designation": "CTO", "image": "ann.png", "content": "Great"
    }))
    .unwrap();
    assert_eq!(testimonial.rating, 5);
    assert!(!testimonial.featured);

    let item: CreateMenuItemRequest =
        serde_json::from_value(json!({ "title": "Home", "path": "/" })).unwrap();
    assert!(item.published);
    assert!(!item.new_tab);
    assert_eq!(item.parent_id, None);
}

#[test]
fn test_comment_request_ignores_approved_flag() {
    let req: CreateCommentRequest = serde_json::from_value(json!({
        "content": "Nice post",
        "author_name": "Reader",
        "author_email": "reader@example.com",
        "approved": true
    }))
    .unwrap();
    assert!(req.validate().is_ok());
}

#[test]
fn test_update_blog_distinguishes_absent_and_empty_tags() {
    let absent: UpdateBlogRequest = serde_json::from_value(json!({ "title": "New" })).unwrap();
    assert_eq!(absent.tag_ids, None);

    let cleared: UpdateBlogRequest = serde_json::from_value(json!({ "tag_ids": [] })).unwrap();
    assert_eq!(cleared.tag_ids, Some(vec![]));
}

#[test]
fn test_bulk_action_is_lowercase() {
    let req: BulkActionRequest = serde_json::from_value(json!({
        "item_ids": [Uuid::new_v4()],
        "action": "unpublish"
    }))
    .unwrap();
    assert_eq!(req.action, BulkAction::Unpublish);
    assert!(serde_json::from_value::<BulkAction>(json!("archive")).is_err());
}

#[test]
fn test_menu_node_flattens_item_fields() {
    let now = chrono::Utc::now();
    let item = |title: &str, parent_id| MenuItem {
        id: Uuid::new_v4(),
        title: title.to_string(),
        path: Some("/x".to_string()),
        new_tab: false,
        order: 1,
        published: true,
        parent_id,
        created_at: now,
        updated_at: now,
    };
    let parent = item("Products", None);
    let child = item("Widgets", Some(parent.id));
    let node = MenuNode::new(parent.clone(), vec![child]);

    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(value["id"], json!(parent.id));
    assert_eq!(value["order"], json!(1));
    assert_eq!(value["children"][0]["title"], json!("Widgets"));
    assert!(value["children"][0].get("children").is_none());
}

#[test]
fn test_page_envelope_shape() {
    let page: Page<i32> = Pagination::new(Some(20), Some(10)).unwrap().wrap(vec![1, 2], 22);
    assert_eq!(
        serde_json::to_value(page).unwrap(),
        json!({ "items": [1, 2], "total": 22, "skip": 20, "limit": 10 })
    );
}

// --- Validation ---

#[test]
fn test_register_validation() {
    let ok = RegisterRequest {
        email: "jane@example.com".to_string(),
        password: "secret1".to_string(),
        name: None,
    };
    assert!(ok.validate().is_ok());

    let short = RegisterRequest {
        password: "12345".to_string(),
        ..ok.clone()
    };
    assert!(short.validate().is_err());

    let bad_email = RegisterRequest {
        email: "not-an-email".to_string(),
        ..ok
    };
    assert!(bad_email.validate().is_err());
}

#[test]
fn test_blog_validation_requires_slug_shape() {
    let mut req = CreateBlogRequest {
        title: "Hello".to_string(),
        content: "Body".to_string(),
        excerpt: "Short".to_string(),
        image: "hello.png".to_string(),
        slug: "hello-world".to_string(),
        published: true,
        featured: false,
        tag_ids: vec![],
    };
    assert!(req.validate().is_ok());

    req.slug = "Hello World".to_string();
    assert!(req.validate().is_err());

    req.slug = "hello".to_string();
    req.title = "   ".to_string();
    assert!(req.validate().is_err());
}

#[test]
fn test_rating_and_price_bounds() {
    let testimonial: CreateTestimonialRequest = serde_json::from_value(json!({
        "name": "Bo", "designation": "CEO", "image": "bo.png", "content": "Ok", "rating": 6
    }))
    .unwrap();
    assert!(testimonial.validate().is_err());

    let plan: CreatePricingPlanRequest = serde_json::from_value(json!({
        "name": "Pro", "price": -1.0, "period": "monthly", "features": ["a"]
    }))
    .unwrap();
    assert!(plan.validate().is_err());
}

#[test]
fn test_contact_status_parse_is_case_insensitive() {
    assert_eq!(ContactStatus::parse("replied").unwrap(), ContactStatus::Replied);
    assert_eq!(ContactStatus::parse(" Archived ").unwrap(), ContactStatus::Archived);
    assert!(ContactStatus::parse("deleted").is_err());
}
