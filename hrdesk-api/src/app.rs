/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use hrdesk_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = hrdesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use hrdesk_shared::assets::{ImageProcessor, LocalContentStore};
use hrdesk_shared::auth::middleware::create_token_middleware;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Image upload pipeline
    pub assets: ImageProcessor,
}

impl AppState {
    /// Creates new application state with images stored in the configured
    /// public directory
    pub fn new(db: PgPool, config: Config) -> Self {
        let store = LocalContentStore::new(config.storage.public_dir.clone());

        Self {
            db,
            config: Arc::new(config),
            assets: ImageProcessor::new(Arc::new(store)),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                    # Health check
/// ├── /storage/{key}             # Stored images
/// └── /api/
///     ├── POST /register
///     ├── POST /login
///     ├── POST /logout           # bearer token required
///     ├── /users                 GET
///     ├── /users/:id             GET PUT DELETE
///     ├── /companys              GET POST
///     ├── /companys/:id          GET PUT POST DELETE
///     ├── /employees             GET POST
///     └── /employees/:id         GET PUT POST DELETE
/// ```
///
/// `POST /:id` is an alias of `PUT /:id` so multipart updates work from
/// clients that cannot send PUT with a file.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Body size limit
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers
/// 5. Authentication (logout only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{auth, companies, employees, health, users};

    let health_routes = Router::new().route("/health", get(health::health_check));

    let guarded_routes = Router::new()
        .route("/logout", post(auth::logout))
        .layer(axum::middleware::from_fn(create_token_middleware(
            state.db.clone(),
        )));

    let api_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(guarded_routes)
        .route("/users", get(users::index))
        .route(
            "/users/:id",
            get(users::show).put(users::update).delete(users::destroy),
        )
        .route("/companys", get(companies::index).post(companies::store))
        .route(
            "/companys/:id",
            get(companies::show)
                .put(companies::update)
                .post(companies::update)
                .delete(companies::destroy),
        )
        .route("/employees", get(employees::index).post(employees::store))
        .route(
            "/employees/:id",
            get(employees::show)
                .put(employees::update)
                .post(employees::update)
                .delete(employees::destroy),
        );

    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .nest_service("/storage", ServeDir::new(&state.config.storage.public_dir))
        .layer(DefaultBodyLimit::max(state.config.storage.upload_limit_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
