pub mod auth;
pub mod listings;
pub mod properties;
pub mod users;
