/// User endpoints
///
/// - `GET    /api/users` - Page of users (`?page=n`, five per page)
/// - `GET    /api/users/:id` - One user
/// - `PUT    /api/users/:id` - Replace name, email, role and password
/// - `DELETE /api/users/:id` - Delete a user and, through the foreign key, their tokens
///
/// Password hashes are never serialized.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiQuery, FormPayload},
    routes::{parse_id, DataResponse, Listing, StatusMessage},
};
use axum::{
    extract::{Path, State},
    Json,
};
use hrdesk_shared::{
    auth::password,
    models::user::{UpdateUser, User},
    pagination::{Page, PageRequest},
    validation::{validate, Rule, Ruleset},
};
use serde::Deserialize;
use uuid::Uuid;

const NOT_FOUND: &str = "User is not found";

/// Update request
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub role: String,
    pub password: String,
}

pub fn update_rules(id: Uuid) -> Ruleset {
    Ruleset::new()
        .field("name", [Rule::Required, Rule::String, Rule::Max(255)])
        .field(
            "email",
            [
                Rule::Required,
                Rule::String,
                Rule::Email,
                Rule::Max(255),
                Rule::unique_except("users", "email", id),
            ],
        )
        .field("role", [Rule::Required, Rule::String, Rule::Max(255)])
        .field("password", [Rule::Required, Rule::String, Rule::Min(8)])
}

pub async fn index(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> ApiResult<Json<Listing<Page<User>>>> {
    let data = User::paginate(&state.db, page).await?;

    Ok(Json(Listing { data }))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<User>> {
    let id = parse_id(&id, NOT_FOUND)?;

    User::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

/// Update a user
///
/// The new password is hashed before it is stored.
///
/// # Errors
///
/// - `404 Not Found`: No such user
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormPayload(payload): FormPayload,
) -> ApiResult<Json<DataResponse<User>>> {
    let id = parse_id(&id, NOT_FOUND)?;

    if User::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    let req: UpdateUserRequest = validate(payload, &update_rules(id), &state.db)
        .await?
        .into_typed()?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            name: req.name,
            email: req.email,
            role: req.role,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(DataResponse::ok("User updated successfully", user)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusMessage>> {
    let id = parse_id(&id, NOT_FOUND)?;

    if !User::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    tracing::info!(user_id = %id, "Deleted user");

    Ok(Json(StatusMessage::ok("Delete successfully")))
}
