use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{error, warn};

use service::attendance::{repository::SeaOrmAttendanceRepository, AttendanceService};
use service::auth::{
    decode_token,
    domain::{AuthUser, Claims, LoginInput, RegisterInput},
    repo::seaorm::SeaOrmAuthRepository,
    service::AuthConfig,
    AuthService,
};
use service::facility_booking::{repository::SeaOrmFacilityBookingRepository, FacilityBookingService};
use service::user_service;

use crate::errors::JsonApiError;

pub const AUTH_COOKIE: &str = "auth_token";

/// Shared handler state; the repository-backed services are built once.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: AuthConfig,
    pub auth_svc: Arc<AuthService<SeaOrmAuthRepository>>,
    pub facility_bookings: Arc<FacilityBookingService<SeaOrmFacilityBookingRepository>>,
    pub attendance: Arc<AttendanceService<SeaOrmAttendanceRepository>>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, auth: AuthConfig) -> Self {
        let auth_svc = Arc::new(AuthService::new(Arc::new(SeaOrmAuthRepository { db: db.clone() }), auth.clone()));
        let facility_bookings = Arc::new(FacilityBookingService::new(Arc::new(SeaOrmFacilityBookingRepository { db: db.clone() })));
        let attendance = Arc::new(AttendanceService::new(Arc::new(SeaOrmAttendanceRepository { db: db.clone() })));
        Self { db, auth, auth_svc, facility_bookings, attendance }
    }
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user: AuthUser,
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: i64,
}

#[utoipa::path(post, path = "/api/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<ServerState>, Json(input): Json<RegisterInput>) -> Result<Json<AuthUser>, JsonApiError> {
    Ok(Json(state.auth_svc.register(input).await?))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized"), (status = 403, description = "Account disabled")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, Json(input): Json<LoginInput>) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth_svc.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let out = LoginOutput { user: session.user, token: session.token, token_type: "Bearer", expires_at: session.expires_at };
    Ok((jar.add(cookie), Json(out)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

/// The account behind the presented token.
pub async fn me(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<models::user::Model>, JsonApiError> {
    Ok(Json(user_service::get_user(&state.db, claims.uid).await?))
}

fn is_public(method: &Method, path: &str) -> bool {
    method == Method::OPTIONS
        || path == "/health"
        || path == "/metrics"
        || path == "/api/auth/login"
        || path == "/api/auth/register"
        || path.starts_with("/api-docs")
}

fn token_from_request(req: &Request) -> Result<Option<String>, JsonApiError> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(Some(t.trim().to_string())),
            _ => Err(JsonApiError::unauthorized("Authorization header must use the Bearer scheme")),
        };
    }
    let cookie_header = req.headers().get(header::COOKIE).and_then(|v| v.to_str().ok()).unwrap_or("");
    let token = cookie_header
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("auth_token="))
        .find(|t| !t.is_empty())
        .map(str::to_string);
    Ok(token)
}

/// Global middleware: everything except the public endpoints needs a token,
/// from `Authorization: Bearer` or the `auth_token` cookie. Missing token is
/// 400, an invalid or expired one 401. Valid claims go into the request
/// extensions for guards and handlers.
pub async fn require_bearer_token_state(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, JsonApiError> {
    if is_public(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }
    let path = req.uri().path().to_string();
    let token = match token_from_request(&req) {
        Ok(Some(t)) => t,
        Ok(None) => {
            warn!(path = %path, "missing Authorization header and auth_token cookie");
            return Err(JsonApiError::bad_request("missing bearer token"));
        }
        Err(e) => {
            warn!(path = %path, "invalid Authorization format");
            return Err(e);
        }
    };
    match decode_token(&token, &state.auth.jwt_secret) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            error!(path = %path, err = %e, "token validation failed");
            Err(JsonApiError::unauthorized("invalid or expired token"))
        }
    }
}
