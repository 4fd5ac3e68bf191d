//! Handlers for the `/auth` resource: registration, login, refresh-rotation,
//! logout, and account activation.
//!
//! Each operation is a bounded, independent unit of work; all shared state
//! lives in the database. Races between operations on the same
//! `(user, device)` pair resolve through [`SessionRepo::rotate`]'s
//! compare-and-swap write, never through in-process locks.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Redirect;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use taskora_core::error::CoreError;
use taskora_core::types::Timestamp;
use taskora_db::models::session::UpsertSession;
use taskora_db::models::user::{CreateUser, User, UserResponse};
use taskora_db::repositories::{SessionRepo, UserRepo};

use crate::auth::jwt::{
    hash_refresh_token, issue_access_token, issue_refresh_token, verify_token, JwtConfig,
    TokenKind,
};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::fingerprint::DeviceFingerprint;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login identifier -- the registered email address.
    pub login: String,
    pub password: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account with activation pending and dispatch the activation
/// email. The email is fire-and-forget: registration succeeds whether or not
/// it can be delivered. No session is created.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<StatusCode> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash,
            activation_token: Uuid::new_v4().to_string(),
        },
    )
    .await?;

    if let Some(token) = &user.activation_token {
        let activation_url = format!(
            "{}/api/v1/auth/activate/{token}",
            state.config.public_url.trim_end_matches('/')
        );
        state.mailer.queue_activation(&user.email, &activation_url);
    }

    tracing::info!(user_id = user.id, "User registered, activation pending");
    Ok(StatusCode::OK)
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password for one device. Returns an access token
/// in the body and the refresh token both in the body and as an HttpOnly
/// cookie. Unknown email and wrong password produce the same 401 so callers
/// cannot enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    fingerprint: DeviceFingerprint,
    Json(input): Json<LoginRequest>,
) -> AppResult<(HeaderMap, Json<AuthResponse>)> {
    let user = UserRepo::find_by_email(&state.pool, &input.login)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(invalid_credentials());
    }

    let pair = mint_token_pair(&user, &state.config.jwt)?;

    // One row per (user, device): a repeat login from the same device
    // overwrites the stored token instead of adding a session.
    SessionRepo::upsert(
        &state.pool,
        &UpsertSession {
            user_id: user.id,
            device_fingerprint: fingerprint.0.clone(),
            refresh_token_hash: pair.refresh_hash.clone(),
            expires_at: pair.expires_at,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Login succeeded");
    auth_success(&user, pair, &state.config.jwt)
}

/// POST /api/v1/auth/refresh
///
/// Exchange the refresh token from the cookie for a fresh access/refresh
/// pair, rotating the stored session row. Every failure mode -- missing
/// cookie, bad signature, expiry, unknown or already-rotated token,
/// fingerprint mismatch, lost rotation race -- maps to the same 401.
pub async fn refresh(
    State(state): State<AppState>,
    fingerprint: DeviceFingerprint,
    headers: HeaderMap,
) -> AppResult<(HeaderMap, Json<AuthResponse>)> {
    let presented = refresh_cookie_value(&headers).ok_or_else(invalid_session)?;

    // Signature and expiry first; cheap rejection of garbage.
    verify_token(&presented, TokenKind::Refresh, &state.config.jwt)
        .map_err(|_| invalid_session())?;

    // The presented token must also be the CURRENT one for its session.
    // A rotated-out token no longer matches any row, so theft/reuse of a
    // stale token dies here even while its signature is still valid.
    let presented_hash = hash_refresh_token(&presented);
    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &presented_hash)
        .await?
        .ok_or_else(invalid_session)?;

    if session.device_fingerprint != fingerprint.0 {
        tracing::warn!(
            user_id = session.user_id,
            "Refresh token presented from a different device"
        );
        return Err(invalid_session());
    }

    // Re-read the user so the new claims reflect the current activation
    // status, not the one frozen into the old token.
    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(invalid_session)?;

    let pair = mint_token_pair(&user, &state.config.jwt)?;

    // Compare-and-swap: of two concurrent refreshes presenting the same
    // token, exactly one lands this update. The loser's presented token was
    // already consumed and is permanently rejected.
    let rotated = SessionRepo::rotate(
        &state.pool,
        user.id,
        &fingerprint.0,
        &presented_hash,
        &pair.refresh_hash,
        pair.expires_at,
    )
    .await?;

    if !rotated {
        return Err(invalid_session());
    }

    tracing::debug!(user_id = user.id, "Refresh token rotated");
    auth_success(&user, pair, &state.config.jwt)
}

/// POST /api/v1/auth/logout
///
/// Clear the device's session and the refresh cookie. Idempotent: reports
/// success whether or not a session existed, so calling it twice is safe.
pub async fn logout(
    State(state): State<AppState>,
    _fingerprint: DeviceFingerprint,
    headers: HeaderMap,
) -> AppResult<(StatusCode, HeaderMap)> {
    if let Some(presented) = refresh_cookie_value(&headers) {
        let deleted =
            SessionRepo::delete_by_refresh_token_hash(&state.pool, &hash_refresh_token(&presented))
                .await?;
        tracing::debug!(deleted, "Logout cleared session rows");
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_static("refresh_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    );
    Ok((StatusCode::NO_CONTENT, headers))
}

/// GET /api/v1/auth/activate/{link}
///
/// Consume an activation link token. The flip-and-clear is a single atomic
/// statement, so a link activates exactly once; a second visit gets 404.
pub async fn activate(
    State(state): State<AppState>,
    Path(link): Path<String>,
) -> AppResult<Redirect> {
    let user = UserRepo::activate_by_token(&state.pool, &link)
        .await?
        .ok_or(AppError::Core(CoreError::InvalidActivationLink))?;

    tracing::info!(user_id = user.id, "Account activated");
    Ok(Redirect::to(&state.config.client_url))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A freshly minted access/refresh pair plus the values the store needs.
struct TokenPair {
    access_token: String,
    refresh_token: String,
    refresh_hash: String,
    expires_at: Timestamp,
}

/// Mint an access/refresh pair embedding the user's current activation status.
fn mint_token_pair(user: &User, jwt: &JwtConfig) -> AppResult<TokenPair> {
    let access_token = issue_access_token(user.id, &user.email, user.is_activated, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let refresh_token = issue_refresh_token(user.id, &user.email, user.is_activated, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let refresh_hash = hash_refresh_token(&refresh_token);
    let expires_at = Utc::now() + chrono::Duration::days(jwt.refresh_token_expiry_days);

    Ok(TokenPair {
        access_token,
        refresh_token,
        refresh_hash,
        expires_at,
    })
}

/// Build the shared login/refresh success response: JSON body plus the
/// HttpOnly refresh cookie.
fn auth_success(
    user: &User,
    pair: TokenPair,
    jwt: &JwtConfig,
) -> AppResult<(HeaderMap, Json<AuthResponse>)> {
    let max_age_secs = jwt.refresh_token_expiry_days * 24 * 60 * 60;
    let cookie = format!(
        "refresh_token={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}",
        pair.refresh_token
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::InternalError(format!("Invalid cookie value: {e}")))?,
    );

    Ok((
        headers,
        Json(AuthResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: jwt.access_token_expiry_mins * 60,
            user: UserResponse::from(user),
        }),
    ))
}

/// Extract the refresh token from the request's `Cookie` header.
fn refresh_cookie_value(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|c| c.trim().strip_prefix("refresh_token="))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Uniform 401 for login failures -- never reveals whether the email or the
/// password was wrong.
fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

/// Uniform 401 for refresh/logout session failures -- never reveals which
/// check (cookie, signature, store lookup, fingerprint, race) rejected it.
fn invalid_session() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid or expired refresh token".into(),
    ))
}
