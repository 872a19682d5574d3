/// Bearer token guard for Axum
///
/// Protected routes require an `Authorization: Bearer <token>` header
/// carrying a personal access token issued at register or login. The guard
/// hashes the token, looks it up, stamps `last_used_at` and adds an
/// [`AuthContext`] to the request extensions.
///
/// # Example
///
/// ```no_run
/// use axum::{Extension, Router, routing::post, middleware};
/// use hrdesk_shared::auth::middleware::{create_token_middleware, AuthContext};
/// use sqlx::PgPool;
///
/// async fn logout(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Bye, user {}", auth.user_id)
/// }
///
/// async fn setup(pool: PgPool) -> Router {
///     Router::new()
///         .route("/logout", post(logout))
///         .layer(middleware::from_fn(create_token_middleware(pool)))
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

use super::token::validate_token_format;
use crate::models::access_token::AccessToken;

/// Authentication context added to request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Token owner
    pub user_id: Uuid,

    /// Token used for this request
    pub token_id: Uuid,
}

impl From<&AccessToken> for AuthContext {
    fn from(token: &AccessToken) -> Self {
        Self {
            user_id: token.user_id,
            token_id: token.id,
        }
    }
}

/// Error type for the token guard
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("missing credentials")]
    MissingCredentials,

    /// Not a Bearer header, or the token is malformed
    #[error("invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Unknown or revoked token
    #[error("invalid token")]
    InvalidToken,

    /// Database error
    #[error("database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::MissingCredentials
            | AuthError::InvalidFormat(_)
            | AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Unauthenticated."),
            AuthError::DatabaseError(detail) => {
                error!(error = %detail, "Token lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "status": false, "message": message }))).into_response()
    }
}

/// Extracts the token from an `Authorization: Bearer` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Non-ASCII header".to_string()))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat("Expected Bearer token".to_string()));
    }

    let token = token.trim();
    if !validate_token_format(token) {
        return Err(AuthError::InvalidFormat("Invalid token format".to_string()));
    }

    Ok(token)
}

/// Resolves request headers to an [`AuthContext`]
pub async fn authenticate(pool: &PgPool, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;

    let access_token = AccessToken::verify(pool, token)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::InvalidToken)?;

    Ok(AuthContext::from(&access_token))
}

/// Token authentication middleware
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - Authorization header is missing
/// - The scheme is not Bearer or the token is malformed
/// - The token is unknown or has been revoked
pub async fn token_auth_middleware(
    pool: PgPool,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let context = authenticate(&pool, req.headers()).await.map_err(|e| {
        debug!(error = %e, path = %req.uri().path(), "Rejected request");
        e
    })?;

    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

/// Creates a token middleware closure bound to a pool
pub fn create_token_middleware(
    pool: PgPool,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>> + Clone {
    move |req, next| {
        let pool = pool.clone();
        Box::pin(token_auth_middleware(pool, req, next))
    }
}
