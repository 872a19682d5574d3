/// Personal access token model and database operations
///
/// Tokens authenticate API clients on guarded routes. A user may hold any
/// number of tokens; logging out revokes all of them at once.
///
/// # Security
///
/// - Tokens are stored as SHA-256 hashes (never plaintext)
/// - The plaintext is returned only from [`AccessToken::issue`]
/// - Revocation deletes the rows, so a revoked token can never be reused
///
/// # Schema
///
/// ```sql
/// CREATE TABLE personal_access_tokens (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_used_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::token::{generate_token, hash_token};

/// Personal access token record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessToken {
    /// Unique token ID
    pub id: Uuid,

    /// Owner of the token
    pub user_id: Uuid,

    /// Label given at issuance (e.g. "API TOKEN" or the user's name)
    pub name: String,

    /// SHA-256 hash of the plaintext token
    #[serde(skip_serializing)]
    pub token_hash: String,

    /// When the token was issued
    pub created_at: DateTime<Utc>,

    /// When the token last passed the auth guard
    pub last_used_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Issues a new token for a user
    ///
    /// Returns the stored record and the plaintext token. The plaintext is
    /// not recoverable afterwards.
    pub async fn issue(
        pool: &PgPool,
        user_id: Uuid,
        name: &str,
    ) -> Result<(Self, String), sqlx::Error> {
        let (plaintext, token_hash) = generate_token();

        let token = sqlx::query_as::<_, AccessToken>(
            r#"
            INSERT INTO personal_access_tokens (user_id, name, token_hash)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, token_hash, created_at, last_used_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(token_hash)
        .fetch_one(pool)
        .await?;

        tracing::debug!(user_id = %user_id, token_id = %token.id, "Issued access token");

        Ok((token, plaintext))
    }

    /// Looks up a plaintext token and stamps `last_used_at`
    ///
    /// Returns `None` for unknown or revoked tokens.
    pub async fn verify(pool: &PgPool, plaintext: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AccessToken>(
            r#"
            UPDATE personal_access_tokens
            SET last_used_at = NOW()
            WHERE token_hash = $1
            RETURNING id, user_id, name, token_hash, created_at, last_used_at
            "#,
        )
        .bind(hash_token(plaintext))
        .fetch_optional(pool)
        .await
    }

    /// Revokes every token owned by a user
    ///
    /// Returns the number of revoked tokens; zero is not an error.
    pub async fn revoke_all(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM personal_access_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_hash_is_not_serialized() {
        let token = AccessToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "API TOKEN".to_string(),
            token_hash: "f".repeat(64),
            created_at: Utc::now(),
            last_used_at: None,
        };

        let json = serde_json::to_value(&token).unwrap();
        assert!(json.get("token_hash").is_none());
        assert_eq!(json["name"], "API TOKEN");
    }
}
