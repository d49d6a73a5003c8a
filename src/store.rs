use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::model::listing::{Listing, UpdateListingRequest};

pub const USER_LISTINGS_KEY: &str = "userListings";
pub const PROPERTIES_KEY: &str = "properties";

// String key-value store in the image of the browser localStorage the
// frontend pages read and write. Values are JSON arrays serialized to
// strings; a missing or unparseable value reads as an empty array.
#[derive(Debug, Default)]
pub struct LocalStore {
    items: RwLock<HashMap<String, String>>,
}

impl LocalStore {
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().unwrap().get(key).cloned()
    }

    pub fn set_item(&self, key: &str, value: String) {
        self.items.write().unwrap().insert(key.to_string(), value);
    }

    // Read-modify-write under the write lock, so two handlers bumping the
    // same counter cannot lose an update
    pub fn update_item(&self, key: &str, f: impl FnOnce(Option<&str>) -> String) {
        let mut items = self.items.write().unwrap();
        let next = f(items.get(key).map(|s| s.as_str()));
        items.insert(key.to_string(), next);
    }
}

#[derive(Clone)]
pub struct ListingStore {
    local: Arc<LocalStore>,
}

impl ListingStore {
    pub fn new() -> Self {
        let store = Self {
            local: Arc::new(LocalStore::default()),
        };
        store.write(PROPERTIES_KEY, &demo_properties());
        store
    }

    fn read(&self, key: &str) -> Vec<Listing> {
        self.local
            .get_item(key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn write(&self, key: &str, listings: &[Listing]) {
        let raw = serde_json::to_string(listings).unwrap_or_else(|_| "[]".to_string());
        self.local.set_item(key, raw);
    }

    fn update<R>(&self, key: &str, f: impl FnOnce(&mut Vec<Listing>) -> R) -> R {
        let mut result = None;
        self.local.update_item(key, |raw| {
            let mut listings: Vec<Listing> = raw
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or_default();
            result = Some(f(&mut listings));
            serde_json::to_string(&listings).unwrap_or_else(|_| "[]".to_string())
        });
        result.expect("update closure always runs")
    }

    // --- owner listings (the "userListings" array) ---

    pub fn listings_for_user(&self, user_id: &str) -> Vec<Listing> {
        self.read(USER_LISTINGS_KEY)
            .into_iter()
            .filter(|listing| listing.user_id == user_id)
            .collect()
    }

    // The dashboard seeds two demo listings the first time an owner with no
    // listings loads it
    pub fn seed_demo_listings(&self, user_id: &str) -> Vec<Listing> {
        self.update(USER_LISTINGS_KEY, |listings| {
            if !listings.iter().any(|l| l.user_id == user_id) {
                listings.extend(demo_user_listings(user_id));
            }
            listings
                .iter()
                .filter(|l| l.user_id == user_id)
                .cloned()
                .collect()
        })
    }

    pub fn insert_user_listing(&self, listing: Listing) {
        self.update(USER_LISTINGS_KEY, |listings| listings.push(listing));
    }

    pub fn user_listing(&self, user_id: &str, id: &str) -> Option<Listing> {
        self.read(USER_LISTINGS_KEY)
            .into_iter()
            .find(|listing| listing.id == id && listing.user_id == user_id)
    }

    pub fn update_user_listing(
        &self,
        user_id: &str,
        id: &str,
        changes: &UpdateListingRequest,
    ) -> Option<Listing> {
        self.update(USER_LISTINGS_KEY, |listings| {
            let listing = listings
                .iter_mut()
                .find(|listing| listing.id == id && listing.user_id == user_id)?;
            changes.apply(listing);
            Some(listing.clone())
        })
    }

    pub fn delete_user_listing(&self, user_id: &str, id: &str) -> bool {
        self.update(USER_LISTINGS_KEY, |listings| {
            let before = listings.len();
            listings.retain(|listing| !(listing.id == id && listing.user_id == user_id));
            listings.len() < before
        })
    }

    // --- public catalog (the "properties" array) ---

    pub fn properties(&self) -> Vec<Listing> {
        self.read(PROPERTIES_KEY)
    }

    pub fn property(&self, id: &str) -> Option<Listing> {
        self.read(PROPERTIES_KEY)
            .into_iter()
            .find(|listing| listing.id == id)
    }

    pub fn record_view(&self, id: &str) -> Option<Listing> {
        self.update(PROPERTIES_KEY, |listings| {
            let listing = listings.iter_mut().find(|listing| listing.id == id)?;
            listing.views += 1;
            Some(listing.clone())
        })
    }

    pub fn record_inquiry(&self, id: &str) -> Option<Listing> {
        self.update(PROPERTIES_KEY, |listings| {
            let listing = listings.iter_mut().find(|listing| listing.id == id)?;
            listing.inquiries += 1;
            Some(listing.clone())
        })
    }
}

impl Default for ListingStore {
    fn default() -> Self {
        Self::new()
    }
}

fn demo_listing(
    id: &str,
    user_id: &str,
    title: &str,
    address: &str,
    price: f64,
    listing_type: &str,
    property_type: &str,
    beds: i32,
    baths: f64,
    sqft: i32,
    description: &str,
    images: Vec<String>,
    featured: bool,
) -> Listing {
    let now = Utc::now();
    Listing {
        id: id.to_string(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        price,
        address: address.to_string(),
        beds,
        baths,
        sqft,
        property_type: property_type.to_string(),
        listing_type: listing_type.to_string(),
        status: "active".to_string(),
        images,
        featured,
        created_at: now,
        expires_at: now + Duration::days(365),
        views: 0,
        inquiries: 0,
        earnings: 0.0,
        cost: 0.0,
    }
}

// The five demo properties shown on the public browse page
pub fn demo_properties() -> Vec<Listing> {
    let mut properties = vec![
        demo_listing(
            "1",
            "demo",
            "Luxury 5-Bedroom Villa",
            "Lekki, Lagos",
            250_000_000.0,
            "sale",
            "house",
            5,
            6.0,
            5000,
            "A stunning villa with a swimming pool and modern amenities.",
            vec!["https://picsum.photos/400/250?random=1".to_string()],
            true,
        ),
        demo_listing(
            "2",
            "demo",
            "Spacious 3-Bedroom Apartment",
            "Wuse 2, Abuja",
            5_000_000.0,
            "rent",
            "condo",
            3,
            3.0,
            2500,
            "Conveniently located in a secure and serene neighborhood.",
            vec!["https://picsum.photos/400/250?random=2".to_string()],
            false,
        ),
        demo_listing(
            "3",
            "demo",
            "Commercial Land",
            "Victoria Island, Lagos",
            1_500_000_000.0,
            "sale",
            "land",
            0,
            0.0,
            10000,
            "Prime commercial land suitable for development.",
            vec!["https://picsum.photos/400/250?random=3".to_string()],
            true,
        ),
        demo_listing(
            "4",
            "demo",
            "Modern 4-Bedroom Townhouse",
            "Ikoyi, Lagos",
            10_000_000.0,
            "lease",
            "townhouse",
            4,
            4.0,
            3500,
            "A contemporary townhouse with a private garden.",
            vec!["https://picsum.photos/400/250?random=4".to_string()],
            false,
        ),
        demo_listing(
            "5",
            "demo",
            "Cozy 2-Bedroom Condo",
            "Ikeja, Lagos",
            3_000_000.0,
            "rent",
            "condo",
            2,
            2.0,
            1800,
            "Perfect for a small family, close to schools and malls.",
            vec!["https://picsum.photos/400/250?random=5".to_string()],
            false,
        ),
    ];
    // The detail page fixtures carry running counters for the first two
    properties[0].views = 1250;
    properties[0].inquiries = 45;
    properties[1].views = 800;
    properties[1].inquiries = 20;
    properties
}

// The two starter listings the dashboard seeds for a fresh owner
fn demo_user_listings(user_id: &str) -> Vec<Listing> {
    let now = Utc::now();
    let mut apartment = demo_listing(
        &Uuid::new_v4().to_string(),
        user_id,
        "2-Bedroom Apartment in Lagos",
        "Ikeja, Lagos",
        1_500_000.0,
        "rent",
        "apartment",
        2,
        2.0,
        1200,
        "Well maintained two bedroom apartment.",
        vec!["https://picsum.photos/400/250?random=11".to_string()],
        false,
    );
    apartment.views = 34;
    apartment.expires_at = now + Duration::days(30);

    let mut duplex = demo_listing(
        &Uuid::new_v4().to_string(),
        user_id,
        "4-Bedroom Duplex in Abuja",
        "Gwarinpa, Abuja",
        80_000_000.0,
        "sale",
        "house",
        4,
        3.0,
        3000,
        "Spacious duplex in a gated estate.",
        vec!["https://picsum.photos/400/250?random=12".to_string()],
        false,
    );
    duplex.views = 87;
    duplex.expires_at = now + Duration::days(60);

    vec![apartment, duplex]
}
