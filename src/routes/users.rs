use axum::{
    Router,
    routing::get,
    extract::Extension,
    http::StatusCode,
    response::Json as RespJson,
};
use sqlx::PgPool;
use tower_cookies::Cookies;

use crate::model::user::User;
use crate::routes::auth::get_user_from_cookie;

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: String,
}

pub fn users_router() -> Router {
    Router::new().route("/me", get(get_me)) // GET /api/users/me
}

// Profile page data for the logged-in user
async fn get_me(
    Extension(pool): Extension<PgPool>,
    cookies: Cookies,
) -> Result<RespJson<ProfileResponse>, (StatusCode, RespJson<serde_json::Value>)> {
    let user_id = get_user_from_cookie(&cookies, &pool).await.map_err(|status| {
        println!("❌ Authentication failed");
        (
            status,
            RespJson(serde_json::json!({ "error": "Authentication required" })),
        )
    })?;

    println!("🔧 Getting profile for user: {}", user_id);

    let row: Option<User> = sqlx::query_as(
        "SELECT id, first_name, last_name, email, phone, password_hash, created_at
         FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        println!("🚨 Database error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            RespJson(serde_json::json!({ "error": "Database error" })),
        )
    })?;

    match row {
        Some(user) => {
            let response = ProfileResponse {
                id: user.id.to_string(),
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                phone: user.phone,
                created_at: user.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            };
            println!("✅ Profile found");
            Ok(RespJson(response))
        }
        None => {
            println!("❌ User not found");
            Err((
                StatusCode::NOT_FOUND,
                RespJson(serde_json::json!({ "error": "User not found" })),
            ))
        }
    }
}
