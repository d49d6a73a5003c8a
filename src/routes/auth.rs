use axum::{
    Router,
    routing::post,
    extract::{Extension, Json, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json as RespJson, Redirect, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

pub const TOKEN_COOKIE: &str = "token";
const BCRYPT_COST: u32 = 12;
const TOKEN_TTL_HOURS: i64 = 24;

// Payload for signup (camelCase wire format, same as the frontend forms)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

// Payload for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

fn jwt_secret() -> String {
    // .env supplies JWT_SECRET in deployment
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "propati-dev-secret".to_string())
}

pub fn sign_token(email: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
}

pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

fn set_token_cookie(cookies: &Cookies, token: String) {
    let mut cookie = Cookie::new(TOKEN_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false); // set to true behind HTTPS
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookies.add(cookie);
}

// Helper to resolve the logged-in user from the token cookie
pub async fn get_user_from_cookie(cookies: &Cookies, pool: &PgPool) -> Result<Uuid, StatusCode> {
    let cookie = cookies.get(TOKEN_COOKIE).ok_or(StatusCode::UNAUTHORIZED)?;
    let claims = verify_token(cookie.value()).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&claims.email)
        .fetch_optional(pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    row.map(|(id,)| id).ok_or(StatusCode::UNAUTHORIZED)
}

// Matches /dashboard and /dashboard/..., not siblings like /dashboard-help
fn is_dashboard_path(path: &str) -> bool {
    path == "/dashboard" || path.starts_with("/dashboard/")
}

// Page guard: /dashboard/* without a token cookie bounces to /auth. Presence
// only, the cookie is not verified here.
pub async fn dashboard_guard(cookies: Cookies, request: Request, next: Next) -> Response {
    if is_dashboard_path(request.uri().path()) && cookies.get(TOKEN_COOKIE).is_none() {
        return Redirect::to("/auth").into_response();
    }
    next.run(request).await
}

pub fn auth_router() -> Router {
    Router::new()
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
}

// Same checks and order as the signup form, first failure wins
fn validate_signup(payload: &SignupRequest) -> Result<(), String> {
    if payload.first_name.trim().is_empty() {
        return Err("First name is required".to_string());
    }
    if payload.last_name.trim().is_empty() {
        return Err("Last name is required".to_string());
    }
    if payload.email.trim().is_empty() {
        return Err("Email is required".to_string());
    }
    if !payload.email.contains('@') {
        return Err("Please enter a valid email address".to_string());
    }
    if payload.phone.trim().is_empty() {
        return Err("Phone number is required".to_string());
    }
    if payload.password.is_empty() {
        return Err("Password is required".to_string());
    }
    if payload.password.len() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }
    Ok(())
}

fn failure(status: StatusCode, message: &str) -> (StatusCode, RespJson<serde_json::Value>) {
    (
        status,
        RespJson(serde_json::json!({ "success": false, "message": message })),
    )
}

pub async fn signup(
    Extension(pool): Extension<PgPool>,
    cookies: Cookies,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, RespJson<serde_json::Value>), (StatusCode, RespJson<serde_json::Value>)> {
    println!("📝 Signup attempt - Email: {}", payload.email);

    validate_signup(&payload).map_err(|message| failure(StatusCode::BAD_REQUEST, &message))?;

    // Check if the email is already registered
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            println!("🚨 Database error checking email: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Error creating user")
        })?;

    if existing.is_some() {
        return Err(failure(StatusCode::BAD_REQUEST, "Email already registered"));
    }

    let password_hash = bcrypt::hash(&payload.password, BCRYPT_COST).map_err(|e| {
        println!("🚨 Password hashing error: {}", e);
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Error creating user")
    })?;

    sqlx::query(
        "INSERT INTO users (id, first_name, last_name, email, phone, password_hash, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&password_hash)
    .bind(Utc::now())
    .execute(&pool)
    .await
    .map_err(|e| {
        // The unique index can still fire between the check and the insert
        let duplicate = e
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code == "23505")
            .unwrap_or(false);
        if duplicate {
            failure(StatusCode::BAD_REQUEST, "Email already registered")
        } else {
            println!("🚨 Database insert error: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Error creating user")
        }
    })?;

    let token = sign_token(&payload.email).map_err(|e| {
        println!("🚨 Token signing error: {}", e);
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Error creating user")
    })?;
    set_token_cookie(&cookies, token);

    println!("✅ User registered: {}", payload.email);
    Ok((
        StatusCode::CREATED,
        RespJson(serde_json::json!({ "success": true })),
    ))
}

pub async fn login(
    Extension(pool): Extension<PgPool>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, RespJson<serde_json::Value>), (StatusCode, RespJson<serde_json::Value>)> {
    println!("🔑 Login attempt - Email: {}", payload.email);

    let row: Option<(Uuid, String)> =
        sqlx::query_as("SELECT id, password_hash FROM users WHERE email = $1")
            .bind(&payload.email)
            .fetch_optional(&pool)
            .await
            .map_err(|e| {
                println!("🚨 Database error: {}", e);
                failure(StatusCode::INTERNAL_SERVER_ERROR, "Error signing in")
            })?;

    let (user_id, password_hash) =
        row.ok_or_else(|| failure(StatusCode::NOT_FOUND, "User Not Found"))?;

    let password_ok = bcrypt::verify(&payload.password, &password_hash).map_err(|e| {
        println!("🚨 Password verification error: {}", e);
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Error signing in")
    })?;
    if !password_ok {
        return Err(failure(StatusCode::NOT_FOUND, "Incorrect Password"));
    }

    let token = sign_token(&payload.email).map_err(|e| {
        println!("🚨 Token signing error: {}", e);
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Error signing in")
    })?;
    set_token_cookie(&cookies, token);

    println!("✅ Login successful for user: {}", user_id);
    Ok((
        StatusCode::CREATED,
        RespJson(serde_json::json!({ "success": true })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_payload() -> SignupRequest {
        SignupRequest {
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            email: "ada@example.com".to_string(),
            phone: "08012345678".to_string(),
            password: "secret123".to_string(),
        }
    }

    #[test]
    fn token_round_trip() {
        let token = sign_token("ada@example.com").unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = sign_token("ada@example.com").unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(verify_token(&tampered).is_err());
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = bcrypt::hash("secret123", 4).unwrap();
        assert!(bcrypt::verify("secret123", &hash).unwrap());
        assert!(!bcrypt::verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn guard_matches_dashboard_pages_only() {
        assert!(is_dashboard_path("/dashboard"));
        assert!(is_dashboard_path("/dashboard/create-listing"));
        assert!(is_dashboard_path("/dashboard/profile"));
        assert!(!is_dashboard_path("/dashboard-help"));
        assert!(!is_dashboard_path("/auth"));
        assert!(!is_dashboard_path("/"));
    }

    #[test]
    fn signup_validation_order_and_messages() {
        let mut payload = signup_payload();
        payload.first_name = " ".to_string();
        payload.password = "x".to_string();
        assert_eq!(
            validate_signup(&payload).unwrap_err(),
            "First name is required"
        );

        let mut payload = signup_payload();
        payload.email = "not-an-email".to_string();
        assert_eq!(
            validate_signup(&payload).unwrap_err(),
            "Please enter a valid email address"
        );

        let mut payload = signup_payload();
        payload.password = "12345".to_string();
        assert_eq!(
            validate_signup(&payload).unwrap_err(),
            "Password must be at least 6 characters long"
        );

        assert!(validate_signup(&signup_payload()).is_ok());
    }
}
