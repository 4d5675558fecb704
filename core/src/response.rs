//! Status check and generic envelope validation for upstream responses.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// A validated response: the top-level JSON object.
pub type Payload = Map<String, Value>;

/// Accept 200 and 201; anything else becomes `ApiError::HttpStatus`.
pub fn check_status(request: &HttpRequest, response: &HttpResponse) -> Result<(), ApiError> {
    if matches!(response.status, 200 | 201) {
        return Ok(());
    }
    warn!(
        endpoint = %request.endpoint,
        url = %request.url,
        status = response.status,
        "upstream returned an error status"
    );
    Err(ApiError::HttpStatus {
        status: response.status,
        url: request.url.clone(),
        body: response.body.clone(),
    })
}

/// Parse `body` as JSON and require a string-keyed mapping at the top level.
pub fn validate_envelope(url: &str, body: &str) -> Result<Payload, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::MalformedResponse {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_value(value).map_err(|e| ApiError::ResponseShape {
        url: url.to_string(),
        message: e.to_string(),
    })
}
