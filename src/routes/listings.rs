use axum::{
    Router,
    routing::{get, post, put, delete},
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as RespJson,
};
use chrono::Utc;
use sqlx::PgPool;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::model::listing::{
    CreateListingRequest,
    DashboardStats,
    Listing,
    ListingListResponse,
    UpdateListingRequest,
    UploadRequest,
    dashboard_stats,
    placeholder_image_urls,
};
use crate::routes::auth::get_user_from_cookie;
use crate::store::ListingStore;

type JsonError = (StatusCode, RespJson<serde_json::Value>);

pub fn listings_router() -> Router {
    println!("🔧 Registering listing routes...");
    Router::new()
        .route("/api/listings", get(list_listings))
        .route("/api/listings", post(create_listing))
        .route("/api/listings/:id", get(get_listing))
        .route("/api/listings/:id", put(update_listing))
        .route("/api/listings/:id", delete(delete_listing))
        .route("/api/dashboard/stats", get(get_dashboard_stats))
        .route("/api/uploads", post(upload_images))
}

async fn require_owner(cookies: &Cookies, pool: &PgPool) -> Result<Uuid, JsonError> {
    get_user_from_cookie(cookies, pool).await.map_err(|status| {
        println!("❌ Authentication failed");
        (
            status,
            RespJson(serde_json::json!({ "error": "Authentication required" })),
        )
    })
}

// List the caller's listings; a fresh owner gets the two demo listings
async fn list_listings(
    Extension(pool): Extension<PgPool>,
    Extension(store): Extension<ListingStore>,
    cookies: Cookies,
) -> Result<RespJson<ListingListResponse>, JsonError> {
    let user_id = require_owner(&cookies, &pool).await?;
    println!("📋 Listing dashboard records for user: {}", user_id);

    let listings = store.seed_demo_listings(&user_id.to_string());
    let total = listings.len() as i64;
    Ok(RespJson(ListingListResponse { listings, total }))
}

// Create a new listing
async fn create_listing(
    Extension(pool): Extension<PgPool>,
    Extension(store): Extension<ListingStore>,
    cookies: Cookies,
    Json(payload): Json<CreateListingRequest>,
) -> Result<(StatusCode, RespJson<Listing>), JsonError> {
    let user_id = require_owner(&cookies, &pool).await?;
    println!("➕ Creating listing \"{}\" for user: {}", payload.title, user_id);

    payload.validate().map_err(|message| {
        (
            StatusCode::BAD_REQUEST,
            RespJson(serde_json::json!({ "error": message })),
        )
    })?;

    let listing = payload.into_listing(
        Uuid::new_v4().to_string(),
        user_id.to_string(),
        Utc::now(),
    );
    store.insert_user_listing(listing.clone());

    println!("✅ Listing created with ID: {} (fee ₦{})", listing.id, listing.cost);
    Ok((StatusCode::CREATED, RespJson(listing)))
}

// Get one of the caller's listings by ID
async fn get_listing(
    Extension(pool): Extension<PgPool>,
    Extension(store): Extension<ListingStore>,
    cookies: Cookies,
    Path(id): Path<String>,
) -> Result<RespJson<Listing>, JsonError> {
    let user_id = require_owner(&cookies, &pool).await?;
    println!("🔍 Getting listing {} for user: {}", id, user_id);

    match store.user_listing(&user_id.to_string(), &id) {
        Some(listing) => Ok(RespJson(listing)),
        None => Err((
            StatusCode::NOT_FOUND,
            RespJson(serde_json::json!({ "error": "Listing not found" })),
        )),
    }
}

// Update a listing, only the provided fields change
async fn update_listing(
    Extension(pool): Extension<PgPool>,
    Extension(store): Extension<ListingStore>,
    cookies: Cookies,
    Path(id): Path<String>,
    Json(payload): Json<UpdateListingRequest>,
) -> Result<RespJson<Listing>, JsonError> {
    let user_id = require_owner(&cookies, &pool).await?;
    println!("🔄 Updating listing {} for user: {}", id, user_id);

    if payload.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            RespJson(serde_json::json!({ "error": "No valid fields to update" })),
        ));
    }

    match store.update_user_listing(&user_id.to_string(), &id, &payload) {
        Some(listing) => Ok(RespJson(listing)),
        None => Err((
            StatusCode::NOT_FOUND,
            RespJson(serde_json::json!({ "error": "Listing not found" })),
        )),
    }
}

// Delete a listing
async fn delete_listing(
    Extension(pool): Extension<PgPool>,
    Extension(store): Extension<ListingStore>,
    cookies: Cookies,
    Path(id): Path<String>,
) -> Result<RespJson<serde_json::Value>, JsonError> {
    let user_id = require_owner(&cookies, &pool).await?;
    println!("🗑️ Deleting listing {} for user: {}", id, user_id);

    if store.delete_user_listing(&user_id.to_string(), &id) {
        Ok(RespJson(serde_json::json!({
            "message": "Listing deleted successfully"
        })))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            RespJson(serde_json::json!({ "error": "Listing not found" })),
        ))
    }
}

// Dashboard stat cards: totals over the caller's listings
async fn get_dashboard_stats(
    Extension(pool): Extension<PgPool>,
    Extension(store): Extension<ListingStore>,
    cookies: Cookies,
) -> Result<RespJson<DashboardStats>, JsonError> {
    let user_id = require_owner(&cookies, &pool).await?;
    println!("📊 Computing dashboard stats for user: {}", user_id);

    let listings = store.listings_for_user(&user_id.to_string());
    Ok(RespJson(dashboard_stats(&listings, Utc::now())))
}

// Image uploads never store bytes, file names become placeholder URLs
async fn upload_images(
    Extension(pool): Extension<PgPool>,
    cookies: Cookies,
    Json(payload): Json<UploadRequest>,
) -> Result<RespJson<serde_json::Value>, JsonError> {
    let user_id = require_owner(&cookies, &pool).await?;
    println!(
        "🖼️ Converting {} upload(s) to placeholders for user: {}",
        payload.file_names.len(),
        user_id
    );

    let urls = placeholder_image_urls(payload.file_names.len(), payload.existing);
    Ok(RespJson(serde_json::json!({ "images": urls })))
}
