//! Marketing catalog: features, testimonials, brands and pricing plans.
//!
//! All four follow one lifecycle. Anonymous callers only ever see published rows, and
//! an unpublished row looks exactly like a missing one to them.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::{AdminUser, OptionalUser},
    error::{AppError, AppJson, AppPath, AppQuery, AppResult},
    models::{
        Brand, CatalogFilter, CreateBrandRequest, CreateFeatureRequest, CreatePricingPlanRequest,
        CreateTestimonialRequest, Feature, MessageResponse, PricingPlan, Testimonial,
        UpdateBrandRequest, UpdateFeatureRequest, UpdatePricingPlanRequest,
        UpdateTestimonialRequest,
    },
    repository::messages,
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CatalogParams {
    /// Admin only; forced to true for everyone else.
    pub published_only: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct TestimonialParams {
    /// Admin only; forced to true for everyone else.
    pub published_only: Option<bool>,
    #[serde(default)]
    pub featured_only: bool,
}

fn catalog_filter(viewer: &OptionalUser, published_only: Option<bool>, featured_only: bool) -> CatalogFilter {
    CatalogFilter {
        published_only: !viewer.is_admin() || published_only.unwrap_or(true),
        featured_only,
    }
}

/// Hides an unpublished row from non-admins.
fn visible<T>(viewer: &OptionalUser, published: bool, row: T, missing: &str) -> AppResult<T> {
    if published || viewer.is_admin() {
        Ok(row)
    } else {
        Err(AppError::not_found(missing))
    }
}

// --- Features ---

#[utoipa::path(
    get,
    path = "/api/features",
    params(CatalogParams),
    responses((status = 200, description = "Features in display order", body = [Feature])),
    tag = "features"
)]
pub async fn list_features(
    viewer: OptionalUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<CatalogParams>,
) -> AppResult<Json<Vec<Feature>>> {
    let filter = catalog_filter(&viewer, params.published_only, false);
    Ok(Json(state.repo.list_features(filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/features/{id}",
    params(("id" = Uuid, Path, description = "Feature id")),
    responses(
        (status = 200, description = "Found", body = Feature),
        (status = 404, description = "Not found")
    ),
    tag = "features"
)]
pub async fn get_feature(
    viewer: OptionalUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Feature>> {
    let feature = state.repo.get_feature(id).await?;
    let published = feature.published;
    Ok(Json(visible(&viewer, published, feature, messages::FEATURE_NOT_FOUND)?))
}

#[utoipa::path(
    post,
    path = "/api/features",
    request_body = CreateFeatureRequest,
    responses(
        (status = 201, description = "Created", body = Feature),
        (status = 400, description = "Invalid input or title already exists")
    ),
    tag = "features"
)]
pub async fn create_feature(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateFeatureRequest>,
) -> AppResult<(StatusCode, Json<Feature>)> {
    payload.validate()?;
    Ok((StatusCode::CREATED, Json(state.repo.create_feature(payload).await?)))
}

#[utoipa::path(
    put,
    path = "/api/features/{id}",
    params(("id" = Uuid, Path, description = "Feature id")),
    request_body = UpdateFeatureRequest,
    responses(
        (status = 200, description = "Updated", body = Feature),
        (status = 400, description = "Invalid input or title already exists"),
        (status = 404, description = "Not found")
    ),
    tag = "features"
)]
pub async fn update_feature(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateFeatureRequest>,
) -> AppResult<Json<Feature>> {
    payload.validate()?;
    Ok(Json(state.repo.update_feature(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/features/{id}",
    params(("id" = Uuid, Path, description = "Feature id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found")
    ),
    tag = "features"
)]
pub async fn delete_feature(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.repo.delete_feature(id).await?;
    Ok(Json(MessageResponse::new("Feature deleted successfully")))
}

// --- Testimonials ---

#[utoipa::path(
    get,
    path = "/api/testimonials",
    params(TestimonialParams),
    responses((status = 200, description = "Testimonials in display order", body = [Testimonial])),
    tag = "testimonials"
)]
pub async fn list_testimonials(
    viewer: OptionalUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<TestimonialParams>,
) -> AppResult<Json<Vec<Testimonial>>> {
    let filter = catalog_filter(&viewer, params.published_only, params.featured_only);
    Ok(Json(state.repo.list_testimonials(filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/testimonials/{id}",
    params(("id" = Uuid, Path, description = "Testimonial id")),
    responses(
        (status = 200, description = "Found", body = Testimonial),
        (status = 404, description = "Not found")
    ),
    tag = "testimonials"
)]
pub async fn get_testimonial(
    viewer: OptionalUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Testimonial>> {
    let testimonial = state.repo.get_testimonial(id).await?;
    let published = testimonial.published;
    Ok(Json(visible(
        &viewer,
        published,
        testimonial,
        messages::TESTIMONIAL_NOT_FOUND,
    )?))
}

#[utoipa::path(
    post,
    path = "/api/testimonials",
    request_body = CreateTestimonialRequest,
    responses(
        (status = 201, description = "Created", body = Testimonial),
        (status = 400, description = "Invalid input or name already exists")
    ),
    tag = "testimonials"
)]
pub async fn create_testimonial(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTestimonialRequest>,
) -> AppResult<(StatusCode, Json<Testimonial>)> {
    payload.validate()?;
    Ok((
        StatusCode::CREATED,
        Json(state.repo.create_testimonial(payload).await?),
    ))
}

#[utoipa::path(
    put,
    path = "/api/testimonials/{id}",
    params(("id" = Uuid, Path, description = "Testimonial id")),
    request_body = UpdateTestimonialRequest,
    responses(
        (status = 200, description = "Updated", body = Testimonial),
        (status = 400, description = "Invalid input or name already exists"),
        (status = 404, description = "Not found")
    ),
    tag = "testimonials"
)]
pub async fn update_testimonial(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateTestimonialRequest>,
) -> AppResult<Json<Testimonial>> {
    payload.validate()?;
    Ok(Json(state.repo.update_testimonial(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/testimonials/{id}",
    params(("id" = Uuid, Path, description = "Testimonial id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found")
    ),
    tag = "testimonials"
)]
pub async fn delete_testimonial(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.repo.delete_testimonial(id).await?;
    Ok(Json(MessageResponse::new("Testimonial deleted successfully")))
}

// --- Brands ---

#[utoipa::path(
    get,
    path = "/api/brands",
    params(CatalogParams),
    responses((status = 200, description = "Brands in display order", body = [Brand])),
    tag = "brands"
)]
pub async fn list_brands(
    viewer: OptionalUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<CatalogParams>,
) -> AppResult<Json<Vec<Brand>>> {
    let filter = catalog_filter(&viewer, params.published_only, false);
    Ok(Json(state.repo.list_brands(filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Found", body = Brand),
        (status = 404, description = "Not found")
    ),
    tag = "brands"
)]
pub async fn get_brand(
    viewer: OptionalUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Brand>> {
    let brand = state.repo.get_brand(id).await?;
    let published = brand.published;
    Ok(Json(visible(&viewer, published, brand, messages::BRAND_NOT_FOUND)?))
}

#[utoipa::path(
    post,
    path = "/api/brands",
    request_body = CreateBrandRequest,
    responses(
        (status = 201, description = "Created", body = Brand),
        (status = 400, description = "Invalid input or name already exists")
    ),
    tag = "brands"
)]
pub async fn create_brand(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBrandRequest>,
) -> AppResult<(StatusCode, Json<Brand>)> {
    payload.validate()?;
    Ok((StatusCode::CREATED, Json(state.repo.create_brand(payload).await?)))
}

#[utoipa::path(
    put,
    path = "/api/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand id")),
    request_body = UpdateBrandRequest,
    responses(
        (status = 200, description = "Updated", body = Brand),
        (status = 400, description = "Invalid input or name already exists"),
        (status = 404, description = "Not found")
    ),
    tag = "brands"
)]
pub async fn update_brand(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateBrandRequest>,
) -> AppResult<Json<Brand>> {
    payload.validate()?;
    Ok(Json(state.repo.update_brand(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found")
    ),
    tag = "brands"
)]
pub async fn delete_brand(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.repo.delete_brand(id).await?;
    Ok(Json(MessageResponse::new("Brand deleted successfully")))
}

// --- Pricing Plans ---

#[utoipa::path(
    get,
    path = "/api/pricing",
    params(CatalogParams),
    responses((status = 200, description = "Plans in display order", body = [PricingPlan])),
    tag = "pricing"
)]
pub async fn list_pricing_plans(
    viewer: OptionalUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<CatalogParams>,
) -> AppResult<Json<Vec<PricingPlan>>> {
    let filter = catalog_filter(&viewer, params.published_only, false);
    Ok(Json(state.repo.list_pricing_plans(filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/pricing/{id}",
    params(("id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Found", body = PricingPlan),
        (status = 404, description = "Not found")
    ),
    tag = "pricing"
)]
pub async fn get_pricing_plan(
    viewer: OptionalUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<PricingPlan>> {
    let plan = state.repo.get_pricing_plan(id).await?;
    let published = plan.published;
    Ok(Json(visible(&viewer, published, plan, messages::PLAN_NOT_FOUND)?))
}

#[utoipa::path(
    post,
    path = "/api/pricing",
    request_body = CreatePricingPlanRequest,
    responses(
        (status = 201, description = "Created", body = PricingPlan),
        (status = 400, description = "Invalid input or name already exists")
    ),
    tag = "pricing"
)]
pub async fn create_pricing_plan(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePricingPlanRequest>,
) -> AppResult<(StatusCode, Json<PricingPlan>)> {
    payload.validate()?;
    Ok((
        StatusCode::CREATED,
        Json(state.repo.create_pricing_plan(payload).await?),
    ))
}

#[utoipa::path(
    put,
    path = "/api/pricing/{id}",
    params(("id" = Uuid, Path, description = "Plan id")),
    request_body = UpdatePricingPlanRequest,
    responses(
        (status = 200, description = "Updated", body = PricingPlan),
        (status = 400, description = "Invalid input or name already exists"),
        (status = 404, description = "Not found")
    ),
    tag = "pricing"
)]
pub async fn update_pricing_plan(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdatePricingPlanRequest>,
) -> AppResult<Json<PricingPlan>> {
    payload.validate()?;
    Ok(Json(state.repo.update_pricing_plan(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/pricing/{id}",
    params(("id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found")
    ),
    tag = "pricing"
)]
pub async fn delete_pricing_plan(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.repo.delete_pricing_plan(id).await?;
    Ok(Json(MessageResponse::new("Pricing plan deleted successfully")))
}
