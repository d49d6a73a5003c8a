use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};

// Listing fee: ₦5,000 base per 30 days, ₦2,500 extra for featured placement
pub const BASE_LISTING_FEE: f64 = 5000.0;
pub const FEATURED_FEE: f64 = 2500.0;
pub const MAX_IMAGES: usize = 10;
pub const MAX_DURATION_DAYS: i64 = 365;

// Listing record as stored in the "userListings" / "properties" JSON arrays.
// Records are loosely typed, so counters and flags default when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub address: String,
    pub beds: i32,
    pub baths: f64,
    pub sqft: i32,
    #[serde(rename = "type", default = "default_property_type")]
    pub property_type: String,
    pub listing_type: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub inquiries: i64,
    #[serde(default)]
    pub earnings: f64,
    #[serde(default)]
    pub cost: f64,
}

fn default_property_type() -> String {
    "house".to_string()
}

fn default_status() -> String {
    "active".to_string()
}

impl Listing {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub address: String,
    pub beds: i32,
    pub baths: f64,
    pub sqft: i32,
    #[serde(rename = "type", default = "default_property_type")]
    pub property_type: String,
    pub listing_type: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_duration")]
    pub duration: i64,
    #[serde(default)]
    pub images: Vec<String>,
}

fn default_duration() -> i64 {
    30
}

impl CreateListingRequest {
    // Same checks and order as the create-listing form, first failure wins
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Description is required".to_string());
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err("Valid price is required".to_string());
        }
        if self.address.trim().is_empty() {
            return Err("Address is required".to_string());
        }
        if self.beds < 0 {
            return Err("Valid number of bedrooms is required".to_string());
        }
        if !self.baths.is_finite() || self.baths < 0.0 {
            return Err("Valid number of bathrooms is required".to_string());
        }
        if self.sqft <= 0 {
            return Err("Valid square footage is required".to_string());
        }
        if self.duration <= 0 || self.duration > MAX_DURATION_DAYS {
            return Err("Valid listing duration is required".to_string());
        }
        if self.images.is_empty() {
            return Err("At least one image is required".to_string());
        }
        Ok(())
    }

    // Listing fee: base * duration * listing-type multiplier, plus featured fee.
    // Computed and recorded on the record, never charged anywhere.
    pub fn cost(&self) -> f64 {
        let duration_multiplier = self.duration as f64 / 30.0;
        let listing_type_multiplier = match self.listing_type.as_str() {
            "rent" => 0.8,
            "lease" => 0.9,
            _ => 1.0,
        };
        let featured_cost = if self.featured { FEATURED_FEE } else { 0.0 };
        BASE_LISTING_FEE * duration_multiplier * listing_type_multiplier + featured_cost
    }

    pub fn into_listing(self, id: String, user_id: String, now: DateTime<Utc>) -> Listing {
        let cost = self.cost();
        Listing {
            id,
            user_id,
            title: self.title,
            description: self.description,
            price: self.price,
            address: self.address,
            beds: self.beds,
            baths: self.baths,
            sqft: self.sqft,
            property_type: self.property_type,
            listing_type: self.listing_type,
            status: "active".to_string(),
            images: self.images,
            featured: self.featured,
            created_at: now,
            expires_at: now + Duration::days(self.duration),
            views: 0,
            inquiries: 0,
            earnings: 0.0,
            cost,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub address: Option<String>,
    pub beds: Option<i32>,
    pub baths: Option<f64>,
    pub sqft: Option<i32>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub status: Option<String>,
    pub images: Option<Vec<String>>,
    pub featured: Option<bool>,
}

impl UpdateListingRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.address.is_none()
            && self.beds.is_none()
            && self.baths.is_none()
            && self.sqft.is_none()
            && self.property_type.is_none()
            && self.listing_type.is_none()
            && self.status.is_none()
            && self.images.is_none()
            && self.featured.is_none()
    }

    // Merge the provided fields into an existing record, absent fields keep
    // their current value
    pub fn apply(&self, listing: &mut Listing) {
        if let Some(title) = &self.title {
            listing.title = title.clone();
        }
        if let Some(description) = &self.description {
            listing.description = description.clone();
        }
        if let Some(price) = self.price {
            listing.price = price;
        }
        if let Some(address) = &self.address {
            listing.address = address.clone();
        }
        if let Some(beds) = self.beds {
            listing.beds = beds;
        }
        if let Some(baths) = self.baths {
            listing.baths = baths;
        }
        if let Some(sqft) = self.sqft {
            listing.sqft = sqft;
        }
        if let Some(property_type) = &self.property_type {
            listing.property_type = property_type.clone();
        }
        if let Some(listing_type) = &self.listing_type {
            listing.listing_type = listing_type.clone();
        }
        if let Some(status) = &self.status {
            listing.status = status.clone();
        }
        if let Some(images) = &self.images {
            listing.images = images.clone();
        }
        if let Some(featured) = self.featured {
            listing.featured = featured;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub beds: Option<i32>,
    pub baths: Option<f64>,
}

fn filter_active(value: &Option<String>) -> Option<&str> {
    match value.as_deref() {
        None | Some("") | Some("all") => None,
        Some(v) => Some(v),
    }
}

impl Listing {
    // The browse page predicates, applied in the same fixed order
    pub fn matches(&self, query: &PropertyQuery) -> bool {
        if let Some(term) = query.search.as_deref().filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let hit = self.title.to_lowercase().contains(&term)
                || self.address.to_lowercase().contains(&term)
                || self.description.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }
        if let Some(property_type) = filter_active(&query.property_type) {
            if self.property_type != property_type {
                return false;
            }
        }
        if let Some(listing_type) = filter_active(&query.listing_type) {
            if self.listing_type != listing_type {
                return false;
            }
        }
        if let Some(min_price) = query.min_price {
            if self.price < min_price {
                return false;
            }
        }
        if let Some(max_price) = query.max_price {
            if self.price > max_price {
                return false;
            }
        }
        if let Some(beds) = query.beds {
            if self.beds < beds {
                return false;
            }
        }
        if let Some(baths) = query.baths {
            if self.baths < baths {
                return false;
            }
        }
        true
    }
}

pub fn filter_properties(listings: &[Listing], query: &PropertyQuery) -> Vec<Listing> {
    listings
        .iter()
        .filter(|listing| listing.matches(query))
        .cloned()
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingListResponse {
    pub listings: Vec<Listing>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListResponse {
    pub properties: Vec<Listing>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_listings: i64,
    pub active_listings: i64,
    pub total_views: i64,
    pub total_earnings: f64,
}

pub fn dashboard_stats(listings: &[Listing], now: DateTime<Utc>) -> DashboardStats {
    DashboardStats {
        total_listings: listings.len() as i64,
        active_listings: listings.iter().filter(|l| l.is_active(now)).count() as i64,
        total_views: listings.iter().map(|l| l.views).sum(),
        total_earnings: listings.iter().map(|l| l.earnings).sum(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}

impl InquiryRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("Email is required".to_string());
        }
        if self.message.trim().is_empty() {
            return Err("Message is required".to_string());
        }
        Ok(())
    }
}

// Uploaded files never leave the client; names are swapped for placeholder
// URLs, at most MAX_IMAGES per listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_names: Vec<String>,
    #[serde(default)]
    pub existing: usize,
}

pub fn placeholder_image_urls(count: usize, existing: usize) -> Vec<String> {
    let available = MAX_IMAGES.saturating_sub(existing);
    (0..count.min(available))
        .map(|index| {
            format!(
                "/placeholder.svg?height=300&width=400&text=Property+Image+{}",
                existing + index + 1
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> CreateListingRequest {
        CreateListingRequest {
            title: "Luxury 5-Bedroom Villa".to_string(),
            description: "A stunning villa with a swimming pool.".to_string(),
            price: 250_000_000.0,
            address: "Lekki, Lagos".to_string(),
            beds: 5,
            baths: 6.0,
            sqft: 5000,
            property_type: "house".to_string(),
            listing_type: "sale".to_string(),
            featured: false,
            duration: 30,
            images: vec!["/placeholder.svg?text=1".to_string()],
        }
    }

    fn sample_listing(id: &str, price: f64) -> Listing {
        let mut listing =
            sample_request().into_listing(id.to_string(), "owner-1".to_string(), Utc::now());
        listing.price = price;
        listing
    }

    #[test]
    fn validation_reports_first_failure() {
        let mut request = sample_request();
        request.title = "  ".to_string();
        request.price = -5.0;
        assert_eq!(request.validate().unwrap_err(), "Title is required");

        let mut request = sample_request();
        request.price = 0.0;
        assert_eq!(request.validate().unwrap_err(), "Valid price is required");

        let mut request = sample_request();
        request.images.clear();
        assert_eq!(
            request.validate().unwrap_err(),
            "At least one image is required"
        );

        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn duration_is_bounded() {
        // i64::MAX would overflow Duration::days in into_listing
        let mut request = sample_request();
        request.duration = i64::MAX;
        assert_eq!(
            request.validate().unwrap_err(),
            "Valid listing duration is required"
        );

        // A negative duration would yield a negative fee and an already
        // expired "active" listing
        let mut request = sample_request();
        request.duration = -90;
        assert_eq!(
            request.validate().unwrap_err(),
            "Valid listing duration is required"
        );

        let mut request = sample_request();
        request.duration = 0;
        assert!(request.validate().is_err());

        let mut request = sample_request();
        request.duration = MAX_DURATION_DAYS;
        assert!(request.validate().is_ok());
        let listing = request.into_listing("1".to_string(), "owner-1".to_string(), Utc::now());
        assert!(listing.cost > 0.0);
        assert!(listing.expires_at > listing.created_at);

        let mut request = sample_request();
        request.duration = MAX_DURATION_DAYS + 1;
        assert!(request.validate().is_err());
    }

    #[test]
    fn listing_fee_arithmetic() {
        let mut request = sample_request();
        assert_eq!(request.cost(), 5000.0);

        request.listing_type = "rent".to_string();
        assert_eq!(request.cost(), 4000.0);

        request.listing_type = "lease".to_string();
        request.duration = 60;
        assert_eq!(request.cost(), 9000.0);

        request.listing_type = "sale".to_string();
        request.duration = 30;
        request.featured = true;
        assert_eq!(request.cost(), 7500.0);
    }

    #[test]
    fn min_price_excludes_listings_below_threshold() {
        let listings = vec![
            sample_listing("1", 3_000_000.0),
            sample_listing("2", 5_000_000.0),
            sample_listing("3", 80_000_000.0),
        ];
        let query = PropertyQuery {
            min_price: Some(5_000_000.0),
            ..Default::default()
        };
        let filtered = filter_properties(&listings, &query);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|l| l.price >= 5_000_000.0));
    }

    #[test]
    fn search_is_case_insensitive_over_text_fields() {
        let mut in_lekki = sample_listing("1", 1.0);
        in_lekki.address = "Lekki, Lagos".to_string();
        let mut in_abuja = sample_listing("2", 1.0);
        in_abuja.title = "Apartment".to_string();
        in_abuja.address = "Wuse 2, Abuja".to_string();
        in_abuja.description = "Serene neighborhood".to_string();

        let query = PropertyQuery {
            search: Some("LEKKI".to_string()),
            ..Default::default()
        };
        let filtered = filter_properties(&[in_lekki, in_abuja.clone()], &query);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "1");

        let query = PropertyQuery {
            search: Some("serene".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_properties(&[in_abuja], &query).len(), 1);
    }

    #[test]
    fn beds_and_baths_are_minimums_and_all_disables() {
        let mut two_bed = sample_listing("1", 1.0);
        two_bed.beds = 2;
        two_bed.baths = 2.0;
        let mut five_bed = sample_listing("2", 1.0);
        five_bed.beds = 5;
        five_bed.baths = 6.0;

        let query = PropertyQuery {
            beds: Some(3),
            ..Default::default()
        };
        let filtered = filter_properties(&[two_bed.clone(), five_bed.clone()], &query);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "2");

        let query = PropertyQuery {
            property_type: Some("all".to_string()),
            listing_type: Some("all".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_properties(&[two_bed, five_bed], &query).len(), 2);
    }

    #[test]
    fn stats_cover_counts_views_and_earnings() {
        let now = Utc::now();
        let mut active = sample_listing("1", 1.0);
        active.views = 34;
        active.earnings = 1000.0;
        let mut expired = sample_listing("2", 1.0);
        expired.expires_at = now - Duration::days(1);
        expired.views = 87;

        let stats = dashboard_stats(&[active, expired], now);
        assert_eq!(stats.total_listings, 2);
        assert_eq!(stats.active_listings, 1);
        assert_eq!(stats.total_views, 121);
        assert_eq!(stats.total_earnings, 1000.0);
    }

    #[test]
    fn partial_update_merges_only_provided_fields() {
        let mut listing = sample_listing("1", 100.0);
        let update = UpdateListingRequest {
            price: Some(200.0),
            status: Some("paused".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply(&mut listing);
        assert_eq!(listing.price, 200.0);
        assert_eq!(listing.status, "paused");
        assert_eq!(listing.title, "Luxury 5-Bedroom Villa");

        assert!(UpdateListingRequest::default().is_empty());
    }

    #[test]
    fn loose_records_parse_with_defaults() {
        let raw = r#"{
            "id": "1",
            "userId": "owner-1",
            "title": "2-Bedroom Apartment in Lagos",
            "price": 1500000,
            "address": "Ikeja, Lagos",
            "beds": 2,
            "baths": 2,
            "sqft": 1200,
            "listingType": "rent",
            "createdAt": "2024-01-15T08:00:00Z",
            "expiresAt": "2099-01-15T08:00:00Z",
            "views": 34,
            "someFutureField": true
        }"#;
        let listing: Listing = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.property_type, "house");
        assert_eq!(listing.status, "active");
        assert_eq!(listing.inquiries, 0);
        assert!(listing.images.is_empty());
        assert!(!listing.featured);
    }

    #[test]
    fn placeholder_urls_are_numbered_and_capped() {
        let urls = placeholder_image_urls(2, 3);
        assert_eq!(
            urls,
            vec![
                "/placeholder.svg?height=300&width=400&text=Property+Image+4",
                "/placeholder.svg?height=300&width=400&text=Property+Image+5",
            ]
        );
        assert_eq!(placeholder_image_urls(5, 9).len(), 1);
        assert!(placeholder_image_urls(3, 10).is_empty());
    }
}
