/// Employee endpoints
///
/// - `GET    /api/employees` - Page of employees, filterable by `name`, `email`, `phone`
/// - `POST   /api/employees` - Create an employee with a profile picture
/// - `GET    /api/employees/:id` - One employee
/// - `PUT    /api/employees/:id` - Update; a new picture replaces the stored one
/// - `DELETE /api/employees/:id` - Delete the employee and their picture
///
/// # Filtering
///
/// ```text
/// GET /api/employees?name=ann&phone=555&page=2
/// ```
///
/// Each filter is a case-insensitive substring match; filters combine with
/// AND. Unlike the other listings the page object is returned unwrapped.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiQuery, FormPayload},
    routes::{parse_id, DataResponse, StatusMessage},
};
use axum::{
    extract::{Path, State},
    Json,
};
use hrdesk_shared::{
    assets::{PROFILE_CREATE, PROFILE_UPDATE},
    models::employee::{CreateEmployee, Employee, EmployeeFilter, UpdateEmployee},
    pagination::{Page, PageRequest},
    validation::{validate, Rule, Ruleset},
};
use serde::Deserialize;
use uuid::Uuid;

const NOT_FOUND: &str = "Employee not found";

/// Text fields of a create request
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeFields {
    pub company_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Text fields of an update request
#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeFields {
    #[serde(default)]
    pub company_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: String,
}

pub fn store_rules() -> Ruleset {
    Ruleset::new()
        .field(
            "company_id",
            [Rule::Required, Rule::exists("companies", "id")],
        )
        .field("name", [Rule::Required, Rule::String, Rule::Max(255)])
        .field("email", [Rule::Required, Rule::String, Rule::Max(255)])
        .field("phone", [Rule::Required, Rule::String, Rule::Max(255)])
        .field("profile", [Rule::Required, Rule::Image(&PROFILE_CREATE)])
}

pub fn update_rules(id: Uuid) -> Ruleset {
    Ruleset::new()
        .field("company_id", [Rule::exists("companies", "id")])
        .field("name", [Rule::Required, Rule::String, Rule::Max(255)])
        .field(
            "email",
            [
                Rule::Required,
                Rule::String,
                Rule::Email,
                Rule::Max(255),
                Rule::unique_except("employees", "email", id),
            ],
        )
        .field("phone", [Rule::Required, Rule::String])
        .field("profile", [Rule::Image(&PROFILE_UPDATE)])
}

pub async fn index(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<EmployeeFilter>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> ApiResult<Json<Page<Employee>>> {
    let employees = Employee::paginate(&state.db, &filter, page).await?;

    Ok(Json(employees))
}

/// Create an employee
///
/// # Endpoint
///
/// ```text
/// POST /api/employees
/// Content-Type: multipart/form-data
///
/// company_id, name, email, phone, profile (jpg/png/jpeg, at most 10240 KiB)
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed (including an unknown
///   `company_id`) or the picture could not be processed
pub async fn store(
    State(state): State<AppState>,
    FormPayload(payload): FormPayload,
) -> ApiResult<Json<DataResponse<Employee>>> {
    let mut validated = validate(payload, &store_rules(), &state.db).await?;
    let profile = validated
        .take_file("profile")
        .ok_or_else(|| ApiError::BadRequest("The profile field must be a file.".to_string()))?;
    let fields: CreateEmployeeFields = validated.into_typed()?;

    let key = state
        .assets
        .store(&profile, &PROFILE_CREATE)
        .await
        .map_err(|e| ApiError::asset("profile", e))?;

    let employee = Employee::create(
        &state.db,
        CreateEmployee {
            company_id: fields.company_id,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            profile: key.clone(),
        },
    )
    .await
    .map_err(|e| {
        tracing::warn!(key = %key, error = %e, "Employee insert failed; stored picture is orphaned");
        e
    })?;

    tracing::info!(
        employee_id = %employee.id,
        company_id = %employee.company_id,
        "Created employee"
    );

    Ok(Json(DataResponse::ok("Employee created successfully", employee)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    let id = parse_id(&id, NOT_FOUND)?;

    Employee::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

/// Update an employee
///
/// Also routed as `POST /api/employees/:id`. `company_id` and `profile` are
/// optional; when absent the stored values are kept.
///
/// # Errors
///
/// - `404 Not Found`: No such employee
/// - `422 Unprocessable Entity`: Validation failed or the picture could not be processed
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormPayload(payload): FormPayload,
) -> ApiResult<Json<DataResponse<Employee>>> {
    let id = parse_id(&id, NOT_FOUND)?;

    let existing = Employee::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    let mut validated = validate(payload, &update_rules(id), &state.db).await?;
    let upload = validated.take_file("profile");
    let fields: UpdateEmployeeFields = validated.into_typed()?;

    let profile = match upload {
        Some(upload) => Some(
            state
                .assets
                .replace(Some(&existing.profile), &upload, &PROFILE_UPDATE)
                .await
                .map_err(|e| ApiError::asset("profile", e))?,
        ),
        None => None,
    };

    let employee = Employee::update(
        &state.db,
        id,
        UpdateEmployee {
            company_id: fields.company_id,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            profile: profile.clone(),
        },
    )
    .await
    .map_err(|e| {
        if let Some(key) = &profile {
            tracing::warn!(key = %key, error = %e, "Employee update failed; stored picture is orphaned");
        }
        e
    })?
    .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(DataResponse::ok("Employee updated successfully", employee)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusMessage>> {
    let id = parse_id(&id, NOT_FOUND)?;

    let employee = Employee::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    if !employee.profile.is_empty() {
        state.assets.discard(&employee.profile).await;
    }

    if !Employee::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    tracing::info!(employee_id = %id, "Deleted employee");

    Ok(Json(StatusMessage::ok("Delete successfully")))
}
