use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse};
use serde_json::{Map, Value, json};

use crate::forms::NON_FIELD_ERRORS;
use crate::services::ServiceError;

pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

/// Translate a failed service call into a JSON error response and log it.
///
/// Client errors are logged at `warn`, persistence and rendering failures at `error`.
pub fn error_response(action: &str, err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Validation { field, message } => {
            log::warn!("{action}: invalid `{field}`: {message}");
            let mut errors = Map::new();
            errors.insert(field, json!([message]));
            HttpResponse::BadRequest().json(json!({ "errors": Value::Object(errors) }))
        }
        ServiceError::DuplicateMembership(_)
        | ServiceError::MembershipNotFound(_)
        | ServiceError::SelfSubscription => {
            log::warn!("{action}: {err}");
            HttpResponse::BadRequest().json(json!({ "errors": err.to_string() }))
        }
        ServiceError::Forbidden => {
            log::warn!("{action}: {err}");
            HttpResponse::Forbidden()
                .json(json!({ "detail": "You do not have permission to perform this action." }))
        }
        ServiceError::NotFound => {
            log::warn!("{action}: {err}");
            HttpResponse::NotFound().json(json!({ "detail": "Not found." }))
        }
        ServiceError::Conflict => {
            log::warn!("{action}: {err}");
            HttpResponse::Conflict().json(json!({ "detail": "Such a record already exists." }))
        }
        ServiceError::Transaction(_) | ServiceError::Internal(_) => {
            log::error!("{action}: {err}");
            HttpResponse::InternalServerError()
                .json(json!({ "detail": "A server error occurred." }))
        }
    }
}

/// Error handler for `web::Json` payloads, reporting them like form validation errors.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let service_error = match &err {
        JsonPayloadError::Deserialize(inner) => {
            let message = inner.to_string();
            match missing_field(&message) {
                Some(field) => ServiceError::validation(field, "This field is required."),
                None => ServiceError::validation(NON_FIELD_ERRORS, message),
            }
        }
        other => ServiceError::validation(NON_FIELD_ERRORS, other.to_string()),
    };

    let response = error_response("parse JSON payload", service_error);
    InternalError::from_response(err, response).into()
}

/// Field name of a serde "missing field `name`" message.
fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")?
        .split('`')
        .next()
        .filter(|field| !field.is_empty())
}
