use axum::{
    Router,
    routing::{get, post},
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as RespJson,
};

use crate::model::listing::{
    InquiryRequest, Listing, PropertyListResponse, PropertyQuery, filter_properties,
};
use crate::model::mortgage::{MortgageRequest, MortgageResponse, monthly_payment};
use crate::store::ListingStore;

type JsonError = (StatusCode, RespJson<serde_json::Value>);

pub fn properties_router() -> Router {
    println!("🔧 Registering property routes...");
    Router::new()
        .route("/api/properties", get(list_properties))
        .route("/api/properties/mortgage", post(calculate_mortgage))
        .route("/api/properties/:id", get(get_property))
        .route("/api/properties/:id/inquiries", post(create_inquiry))
}

// Public browse: linear scan over the catalog with the search box and
// filter dropdowns applied in order
async fn list_properties(
    Extension(store): Extension<ListingStore>,
    Query(query): Query<PropertyQuery>,
) -> RespJson<PropertyListResponse> {
    println!("📋 Browsing properties with filters: {:?}", query);

    let properties = filter_properties(&store.properties(), &query);
    let total = properties.len() as i64;
    RespJson(PropertyListResponse { properties, total })
}

// Detail view; every hit counts as a view
async fn get_property(
    Extension(store): Extension<ListingStore>,
    Path(id): Path<String>,
) -> Result<RespJson<Listing>, JsonError> {
    println!("🔍 Getting property with ID: {}", id);

    match store.record_view(&id) {
        Some(property) => Ok(RespJson(property)),
        None => Err((
            StatusCode::NOT_FOUND,
            RespJson(serde_json::json!({ "error": "Property not found" })),
        )),
    }
}

// Contact form: validates, bumps the inquiry counter, thanks the sender
async fn create_inquiry(
    Extension(store): Extension<ListingStore>,
    Path(id): Path<String>,
    Json(payload): Json<InquiryRequest>,
) -> Result<(StatusCode, RespJson<serde_json::Value>), JsonError> {
    println!("✉️ Inquiry for property {} from {}", id, payload.email);

    payload.validate().map_err(|message| {
        (
            StatusCode::BAD_REQUEST,
            RespJson(serde_json::json!({ "error": message })),
        )
    })?;

    if store.record_inquiry(&id).is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            RespJson(serde_json::json!({ "error": "Property not found" })),
        ));
    }

    Ok((
        StatusCode::CREATED,
        RespJson(serde_json::json!({
            "success": true,
            "message": "Your inquiry has been sent! The property owner will contact you soon."
        })),
    ))
}

// Mortgage calculator: single monthly-payment estimate, no schedule
async fn calculate_mortgage(
    Json(payload): Json<MortgageRequest>,
) -> RespJson<MortgageResponse> {
    let payment = monthly_payment(payload.loan_amount, payload.interest_rate, payload.loan_term);
    println!(
        "🧮 Mortgage estimate: ₦{} at {}% over {} years -> ₦{:.2}/month",
        payload.loan_amount, payload.interest_rate, payload.loan_term, payment
    );
    RespJson(MortgageResponse {
        monthly_payment: payment,
    })
}
