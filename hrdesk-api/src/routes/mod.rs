/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and logout
/// - `users`: User listing and maintenance
/// - `companies`: Company CRUD with logo upload
/// - `employees`: Employee CRUD with profile picture upload

pub mod auth;
pub mod companies;
pub mod employees;
pub mod health;
pub mod users;

use crate::error::{ApiError, ApiResult};
use serde::Serialize;
use uuid::Uuid;

/// `{status, message}` acknowledgement
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: bool,
    pub message: String,
}

impl StatusMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
        }
    }
}

/// `{status, message, data}` response for writes
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub status: bool,
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            data,
        }
    }
}

/// `{data: page}` wrapper used by the user and company listings
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub data: T,
}

/// Parses a path id; anything that is not a UUID cannot name a record
pub(crate) fn parse_id(raw: &str, not_found: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}
