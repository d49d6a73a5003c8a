use axum::{
    routing::get,
    extract::Extension,
    middleware,
    Router,
};
use tower_http::{
    services::{ServeDir, ServeFile},
    cors::{CorsLayer, Any},
};
use tower_cookies::CookieManagerLayer;
use dotenv::dotenv;
use sqlx::PgPool;

mod model;
mod routes;
mod store;

use routes::auth::{auth_router, dashboard_guard};
use routes::listings::listings_router;
use routes::properties::properties_router;
use routes::users::users_router;
use store::ListingStore;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Connect to PostgreSQL (users only, listings never touch the database)
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&database_url).await.expect("Failed to connect to Postgres");

    // In-process listing store, seeded with the public demo catalog
    let store = ListingStore::new();

    let serve_dir = ServeDir::new("../fe/dist")
        .not_found_service(ServeFile::new("../fe/dist/index.html"));

    let app = Router::new()
        // Merge auth routes (signup & login)
        .merge(auth_router())
        // Merge listing routes (owner CRUD, stats, uploads)
        .merge(listings_router())
        // Merge property routes (public browse, detail, inquiries, mortgage)
        .merge(properties_router())
        // Merge users routes (profile)
        .nest("/api/users", users_router())
        .route("/api/hello", get(|| async { "Hello from the Propati backend!" }))

        // This makes the static file service handle all other requests
        .fallback_service(serve_dir)
        // /dashboard pages bounce to /auth without the token cookie
        .layer(middleware::from_fn(dashboard_guard))
        // Add database pool and listing store
        .layer(Extension(pool))
        .layer(Extension(store))
        // Cookie jar for the token cookie
        .layer(CookieManagerLayer::new())
        // Add CORS for frontend
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let addr = "127.0.0.1:8000";
    println!("🚀 Listening on http://{}", addr);

    // Create the TCP listener
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap();

    // This is the correct way to run the server in Axum 0.7
    axum::serve(listener, app).await.unwrap();
}
