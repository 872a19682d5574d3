/// Database models for HR Desk
///
/// Each model owns its CRUD operations as associated async functions taking
/// a `&PgPool`, so handlers call e.g. `Company::find_by_id(&pool, id)`.
///
/// # Models
///
/// - `user`: User accounts (register/login, profile CRUD)
/// - `access_token`: Personal access tokens owned by users
/// - `company`: Companies with an uploaded logo
/// - `employee`: Employees belonging to a company, with a profile photo
///
/// # Example
///
/// ```no_run
/// use hrdesk_shared::models::company::{Company, CreateCompany};
/// use hrdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let company = Company::create(&pool, CreateCompany {
///     name: "Acme".to_string(),
///     email: "hello@acme.test".to_string(),
///     website: "https://acme.test".to_string(),
///     logo: "5f0c..._acme.png".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod access_token;
pub mod company;
pub mod employee;
pub mod user;
