/// Employee model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE employees (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     company_id UUID NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     phone VARCHAR(255) NOT NULL,
///     profile VARCHAR(512) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `company_id` is checked against `companies` when written but carries no
/// foreign key, so removing a company does not touch its employees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::pagination::{Page, PageRequest};

const EMPLOYEE_COLUMNS: &str =
    "id, company_id, name, email, phone, profile, created_at, updated_at";

/// Employee record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    /// Unique employee ID
    pub id: Uuid,

    /// Company the employee belongs to
    pub company_id: Uuid,

    pub name: String,

    pub email: String,

    pub phone: String,

    /// Content-store key of the profile photo
    pub profile: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating an employee
#[derive(Debug, Clone)]
pub struct CreateEmployee {
    pub company_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub profile: String,
}

/// Input for updating an employee
///
/// `None` for `company_id` or `profile` keeps the stored value.
#[derive(Debug, Clone)]
pub struct UpdateEmployee {
    pub company_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub profile: Option<String>,
}

/// Substring filters for listing employees
///
/// Each present field narrows the result with a case-insensitive
/// `ILIKE '%value%'`; filters are combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl EmployeeFilter {
    fn conditions(&self) -> Vec<(&'static str, String)> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.as_deref().map(|v| (column, like_pattern(v))))
        .collect()
    }

    fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        for (i, (column, pattern)) in self.conditions().into_iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            builder.push(column).push(" ILIKE ").push_bind(pattern);
        }
    }
}

/// Wraps a needle in `%...%`, escaping LIKE metacharacters
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Employee {
    /// Creates an employee
    pub async fn create(pool: &PgPool, data: CreateEmployee) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO employees (company_id, name, email, phone, profile)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        );

        sqlx::query_as::<_, Employee>(&query)
            .bind(data.company_id)
            .bind(data.name)
            .bind(data.email)
            .bind(data.phone)
            .bind(data.profile)
            .fetch_one(pool)
            .await
    }

    /// Finds an employee by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM employees WHERE id = $1", EMPLOYEE_COLUMNS);

        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Updates an employee
    ///
    /// Returns `None` if the employee no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateEmployee,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE employees
            SET company_id = COALESCE($2, company_id),
                name = $3,
                email = $4,
                phone = $5,
                profile = COALESCE($6, profile),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        );

        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(data.company_id)
            .bind(data.name)
            .bind(data.email)
            .bind(data.phone)
            .bind(data.profile)
            .fetch_optional(pool)
            .await
    }

    /// Deletes an employee by ID
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts employees matching a filter
    pub async fn count(pool: &PgPool, filter: &EmployeeFilter) -> Result<i64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM employees");
        filter.push_where(&mut builder);

        let (count,): (i64,) = builder.build_query_as().fetch_one(pool).await?;

        Ok(count)
    }

    /// Fetches one page of employees matching a filter, oldest first
    pub async fn paginate(
        pool: &PgPool,
        filter: &EmployeeFilter,
        request: PageRequest,
    ) -> Result<Page<Self>, sqlx::Error> {
        let total = Self::count(pool, filter).await?;

        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM employees", EMPLOYEE_COLUMNS));
        filter.push_where(&mut builder);
        builder
            .push(" ORDER BY created_at ASC, id ASC LIMIT ")
            .push_bind(request.limit())
            .push(" OFFSET ")
            .push_bind(request.offset());

        let employees = builder.build_query_as::<Employee>().fetch_all(pool).await?;

        Ok(Page::new(employees, total, request))
    }
}
