/// Company endpoints
///
/// - `GET    /api/companys` - Page of companies (`?page=n`, five per page)
/// - `POST   /api/companys` - Create a company with a logo upload
/// - `GET    /api/companys/:id` - One company
/// - `PUT    /api/companys/:id` - Update; a new logo replaces the stored one
/// - `DELETE /api/companys/:id` - Delete the company and its logo file
///
/// Logos go through the image pipeline (checked, scaled to at most 300px
/// wide) and the row stores only the resulting storage key.

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
    assets::LOGO,
    models::company::{Company, CreateCompany, UpdateCompany},
    pagination::{Page, PageRequest},
    validation::{validate, Rule, Ruleset},
};
use serde::Deserialize;
use uuid::Uuid;

const NOT_FOUND: &str = "Company not found";

/// Text fields of a create/update request; the logo is taken separately
#[derive(Debug, Deserialize)]
pub struct CompanyFields {
    pub name: String,
    pub email: String,
    pub website: String,
}

fn base_rules(email_unique: Rule, logo: Vec<Rule>) -> Ruleset {
    Ruleset::new()
        .field("name", [Rule::Required, Rule::String, Rule::Max(255)])
        .field(
            "email",
            [
                Rule::Required,
                Rule::String,
                Rule::Email,
                Rule::Max(255),
                email_unique,
            ],
        )
        .field("logo", logo)
        .field("website", [Rule::Required, Rule::String, Rule::Url])
}

pub fn store_rules() -> Ruleset {
    base_rules(
        Rule::unique("companies", "email"),
        vec![Rule::Required, Rule::Image(&LOGO)],
    )
}

pub fn update_rules(id: Uuid) -> Ruleset {
    base_rules(
        Rule::unique_except("companies", "email", id),
        vec![Rule::Image(&LOGO)],
    )
}

pub async fn index(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> ApiResult<Json<Listing<Page<Company>>>> {
    let data = Company::paginate(&state.db, page).await?;

    Ok(Json(Listing { data }))
}

/// Create a company
///
/// # Endpoint
///
/// ```text
/// POST /api/companys
/// Content-Type: multipart/form-data
///
/// name, email, website, logo (jpeg/png/jpg/gif, at most 2048 KiB)
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed or the logo could not be processed
pub async fn store(
    State(state): State<AppState>,
    FormPayload(payload): FormPayload,
) -> ApiResult<Json<DataResponse<Company>>> {
    let mut validated = validate(payload, &store_rules(), &state.db).await?;
    let logo = validated
        .take_file("logo")
        .ok_or_else(|| ApiError::BadRequest("The logo field must be a file.".to_string()))?;
    let fields: CompanyFields = validated.into_typed()?;

    let key = state
        .assets
        .store(&logo, &LOGO)
        .await
        .map_err(|e| ApiError::asset("logo", e))?;

    let company = Company::create(
        &state.db,
        CreateCompany {
            name: fields.name,
            email: fields.email,
            website: fields.website,
            logo: key.clone(),
        },
    )
    .await
    .map_err(|e| {
        tracing::warn!(key = %key, error = %e, "Company insert failed; stored logo is orphaned");
        e
    })?;

    tracing::info!(company_id = %company.id, logo = %company.logo, "Created company");

    Ok(Json(DataResponse::ok("Company created successfully", company)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Company>> {
    let id = parse_id(&id, NOT_FOUND)?;

    Company::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

/// Update a company
///
/// Also routed as `POST /api/companys/:id` for multipart clients. Without a
/// logo the stored one is kept.
///
/// # Errors
///
/// - `404 Not Found`: No such company
/// - `422 Unprocessable Entity`: Validation failed or the logo could not be processed
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormPayload(payload): FormPayload,
) -> ApiResult<Json<DataResponse<Company>>> {
    let id = parse_id(&id, NOT_FOUND)?;

    let existing = Company::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    let mut validated = validate(payload, &update_rules(id), &state.db).await?;
    let upload = validated.take_file("logo");
    let fields: CompanyFields = validated.into_typed()?;

    let logo = match upload {
        Some(upload) => Some(
            state
                .assets
                .replace(Some(&existing.logo), &upload, &LOGO)
                .await
                .map_err(|e| ApiError::asset("logo", e))?,
        ),
        None => None,
    };

    let company = Company::update(
        &state.db,
        id,
        UpdateCompany {
            name: fields.name,
            email: fields.email,
            website: fields.website,
            logo: logo.clone(),
        },
    )
    .await
    .map_err(|e| {
        if let Some(key) = &logo {
            tracing::warn!(key = %key, error = %e, "Company update failed; stored logo is orphaned");
        }
        e
    })?
    .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(DataResponse::ok("Company updated successfully", company)))
}

/// Delete a company
///
/// The logo file is removed on a best-effort basis; employees of the
/// company are left in place.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusMessage>> {
    let id = parse_id(&id, NOT_FOUND)?;

    let company = Company::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    if !company.logo.is_empty() {
        state.assets.discard(&company.logo).await;
    }

    if !Company::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    tracing::info!(company_id = %id, "Deleted company");

    Ok(Json(StatusMessage::ok("Delete successfully")))
}
