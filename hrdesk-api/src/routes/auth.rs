/// Authentication endpoints
///
/// - `POST /api/register` - Create an account and get a token
/// - `POST /api/login` - Exchange credentials for a new token
/// - `POST /api/logout` - Revoke every token of the caller (bearer token required)
///
/// Request bodies may be JSON, urlencoded or multipart.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::FormPayload,
    routes::StatusMessage,
};
use axum::{extract::State, Extension, Json};
use hrdesk_shared::{
    auth::{middleware::AuthContext, password},
    models::{
        access_token::AccessToken,
        user::{CreateUser, User},
    },
    validation::{validate, Rule, Ruleset},
};
use serde::{Deserialize, Serialize};

/// Name given to tokens issued at registration
pub const REGISTER_TOKEN_NAME: &str = "API TOKEN";

const INVALID_CREDENTIALS: &str = "The provided credentials are incorrect";

/// Register request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub role: String,
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: bool,
    pub message: String,

    /// Plaintext bearer token, only ever returned here
    pub token: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: bool,
    pub message: String,
    pub user: User,
    pub token: String,
}

pub fn register_rules() -> Ruleset {
    Ruleset::new()
        .field("name", [Rule::Required, Rule::String, Rule::Max(255)])
        .field(
            "email",
            [
                Rule::Required,
                Rule::String,
                Rule::Email,
                Rule::Max(255),
                Rule::unique("users", "email"),
            ],
        )
        .field("role", [Rule::Required, Rule::String, Rule::Max(255)])
        .field("password", [Rule::Required, Rule::String, Rule::Min(8)])
}

pub fn login_rules() -> Ruleset {
    Ruleset::new()
        .field(
            "email",
            [Rule::Required, Rule::String, Rule::Email, Rule::Max(255)],
        )
        .field("password", [Rule::Required, Rule::String, Rule::Min(8)])
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/register
///
/// name=Ada&email=ada@example.com&role=admin&password=password1
/// ```
///
/// # Response
///
/// ```json
/// { "status": true, "message": "success", "token": "hrd_..." }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed (including a taken email)
/// - `409 Conflict`: Email registered concurrently
pub async fn register(
    State(state): State<AppState>,
    FormPayload(payload): FormPayload,
) -> ApiResult<Json<RegisterResponse>> {
    let req: RegisterRequest = validate(payload, &register_rules(), &state.db)
        .await?
        .into_typed()?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            role: req.role,
            password_hash,
        },
    )
    .await?;

    let (_, token) = AccessToken::issue(&state.db, user.id, REGISTER_TOKEN_NAME).await?;

    tracing::info!(user_id = %user.id, "Registered user");

    Ok(Json(RegisterResponse {
        status: true,
        message: "success".to_string(),
        token,
    }))
}

/// Login endpoint
///
/// An unknown email and a wrong password produce the same 401 response.
///
/// # Response
///
/// ```json
/// {
///   "status": true,
///   "message": "Login successfully",
///   "user": { "id": "uuid", "name": "Ada", "email": "ada@example.com", "role": "admin", ... },
///   "token": "hrd_..."
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Malformed email or short password
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    FormPayload(payload): FormPayload,
) -> ApiResult<Json<LoginResponse>> {
    let req: LoginRequest = validate(payload, &login_rules(), &state.db)
        .await?
        .into_typed()?;

    let Some(user) = User::find_by_email(&state.db, &req.email).await? else {
        tracing::debug!("Login for unknown email");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login with wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let (_, token) = AccessToken::issue(&state.db, user.id, &user.name).await?;

    Ok(Json(LoginResponse {
        status: true,
        message: "Login successfully".to_string(),
        user,
        token,
    }))
}

/// Logout endpoint
///
/// Deletes every token the caller owns, including the one used for this
/// request.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<StatusMessage>> {
    let revoked = AccessToken::revoke_all(&state.db, auth.user_id).await?;

    tracing::info!(user_id = %auth.user_id, revoked, "Logged out");

    Ok(Json(StatusMessage::ok("You are logged out")))
}
