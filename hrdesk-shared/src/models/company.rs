/// Company model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE companies (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     website VARCHAR(2048) NOT NULL,
///     logo VARCHAR(512) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX companies_email_key ON companies (LOWER(email));
/// ```
///
/// `logo` holds the content-store key of the resized logo. Deleting a
/// company leaves its employees in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::pagination::{Page, PageRequest};

const COMPANY_COLUMNS: &str = "id, name, email, website, logo, created_at, updated_at";

/// Company record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    /// Unique company ID
    pub id: Uuid,

    /// Company name
    pub name: String,

    /// Contact email, unique case-insensitively
    pub email: String,

    /// Website URL
    pub website: String,

    /// Content-store key of the logo image
    pub logo: String,

    /// When the company was created
    pub created_at: DateTime<Utc>,

    /// When the company was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a company
#[derive(Debug, Clone)]
pub struct CreateCompany {
    pub name: String,
    pub email: String,
    pub website: String,
    /// Key returned by the image processor
    pub logo: String,
}

/// Input for updating a company
///
/// `logo` is `None` when no new logo was uploaded; the stored key is kept.
#[derive(Debug, Clone)]
pub struct UpdateCompany {
    pub name: String,
    pub email: String,
    pub website: String,
    pub logo: Option<String>,
}

impl Company {
    /// Creates a company
    pub async fn create(pool: &PgPool, data: CreateCompany) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name, email, website, logo) VALUES ($1, $2, $3, $4) RETURNING {}",
            COMPANY_COLUMNS
        );

        sqlx::query_as::<_, Company>(&query)
            .bind(data.name)
            .bind(data.email)
            .bind(data.website)
            .bind(data.logo)
            .fetch_one(pool)
            .await
    }

    /// Finds a company by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM companies WHERE id = $1", COMPANY_COLUMNS);

        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Updates a company, keeping the current logo when none is given
    ///
    /// Returns `None` if the company no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCompany,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE companies
            SET name = $2, email = $3, website = $4, logo = COALESCE($5, logo), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        );

        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(data.name)
            .bind(data.email)
            .bind(data.website)
            .bind(data.logo)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a company by ID
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists companies, oldest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM companies ORDER BY created_at ASC, id ASC LIMIT $1 OFFSET $2",
            COMPANY_COLUMNS
        );

        sqlx::query_as::<_, Company>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Counts all companies
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM companies")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Fetches one page of companies
    pub async fn paginate(pool: &PgPool, request: PageRequest) -> Result<Page<Self>, sqlx::Error> {
        let total = Self::count(pool).await?;
        let companies = Self::list(pool, request.limit(), request.offset()).await?;

        Ok(Page::new(companies, total, request))
    }
}
