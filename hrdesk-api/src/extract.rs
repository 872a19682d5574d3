/// Request body extraction for create/update endpoints
///
/// [`FormPayload`] accepts the three body encodings clients use and turns
/// each into a validation [`Payload`]:
///
/// | Content-Type | Fields |
/// |---|---|
/// | `multipart/form-data` | text parts as text, parts with a filename as files |
/// | `application/x-www-form-urlencoded` | text |
/// | `application/json` | top-level object members |
///
/// A request without a body (and without a content type) yields an empty
/// payload, so the ruleset reports every required field.
///
/// [`ApiQuery`] wraps axum's `Query` so a malformed query string is
/// reported in the same JSON error shape as every other failure.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Multipart, Query, Request},
    http::header,
    Form, Json,
};
use hrdesk_shared::assets::UploadedFile;
use hrdesk_shared::validation::Payload;
use serde_json::Value;

use crate::error::ApiError;

/// Submitted fields of a create/update request
#[derive(Debug, Default)]
pub struct FormPayload(pub Payload);

/// Query string parameters, rejected as [`ApiError::BadRequest`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[async_trait]
impl<S> FromRequest<S> for FormPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(mime_essence);

        match content_type.as_deref() {
            None | Some("") => Ok(FormPayload(Payload::new())),

            Some("multipart/form-data") => {
                let mut multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;

                let mut payload = Payload::new();
                while let Some(field) = multipart.next_field().await? {
                    let Some(name) = field.name().map(str::to_owned) else {
                        continue;
                    };

                    match field.file_name().map(str::to_owned) {
                        Some(file_name) => {
                            let content_type = field.content_type().map(str::to_owned);
                            let bytes = field.bytes().await?;
                            payload.insert_file(
                                name,
                                UploadedFile::new(file_name, content_type, bytes),
                            );
                        }
                        None => {
                            let text = field.text().await?;
                            payload.insert_text(name, text);
                        }
                    }
                }

                Ok(FormPayload(payload))
            }

            Some("application/x-www-form-urlencoded") => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;

                Ok(FormPayload(Payload::from_pairs(pairs)))
            }

            Some("application/json") => {
                let Json(value) = Json::<Value>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;

                match value {
                    Value::Object(object) => Ok(FormPayload(Payload::from_json_object(object))),
                    _ => Err(ApiError::BadRequest(
                        "JSON body must be an object".to_string(),
                    )),
                }
            }

            Some(other) => Err(ApiError::UnsupportedMediaType(format!(
                "Unsupported content type: {}",
                other
            ))),
        }
    }
}
