//! Request builder and response parser for registry-described endpoints.
//!
//! # Design
//! `StatsClient` holds only a base URL and a shared, immutable registry, so
//! it carries no mutable state between calls. Each call is split into
//! `build_request`, which turns an endpoint name and JSON arguments into an
//! `HttpRequest`, and `parse_response`, which validates an `HttpResponse`.
//! `call` joins the two through a `Transport`.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::classify::{classify, is_supplied};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::query;
use crate::registry::Registry;
use crate::resolve::resolve;
use crate::response::{check_status, validate_envelope, Payload};
use crate::transport::Transport;

/// Stateless client for the endpoints of a `Registry`.
#[derive(Debug, Clone)]
pub struct StatsClient {
    base_url: String,
    registry: Arc<Registry>,
}

impl StatsClient {
    /// Client for `registry`, targeting the registry's own base URL.
    pub fn new(registry: Arc<Registry>) -> Result<Self, ApiError> {
        let base_url = registry.base_url().to_string();
        Self::with_base_url(registry, &base_url)
    }

    /// Client for `registry`, targeting `base_url` instead of the registry's
    /// default (a staging host or a local mock server).
    pub fn with_base_url(registry: Arc<Registry>, base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: "expected an http or https URL".to_string(),
            });
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: "base URL must not carry a query or fragment".to_string(),
            });
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            registry,
        })
    }

    /// Client for the embedded upstream registry.
    pub fn builtin() -> Result<Self, ApiError> {
        Self::new(Registry::builtin()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Build the GET request for `endpoint` with `args`.
    ///
    /// `args` must be a JSON object (or null for no arguments). Fails fast,
    /// before any I/O, when the endpoint is unknown, when no required
    /// parameter group is satisfied, or when a required path parameter has
    /// neither a value nor a default.
    pub fn build_request(&self, endpoint: &str, args: &Value) -> Result<HttpRequest, ApiError> {
        let descriptor = self.registry.lookup(endpoint)?;

        let empty = Map::new();
        let args = match args {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(ApiError::InvalidArguments {
                    endpoint: endpoint.to_string(),
                    reason: format!("expected a JSON object, got {other}"),
                })
            }
        };

        let unsatisfied = descriptor.unsatisfied_groups(|key| is_supplied(args, key));
        if !unsatisfied.is_empty() {
            return Err(ApiError::MissingRequiredParameters {
                endpoint: endpoint.to_string(),
                groups: unsatisfied,
            });
        }

        let classified = classify(descriptor, args);
        let path = resolve(descriptor, &classified.path)?;

        let mut url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        query::append(&mut url, &classified.query);
        debug!(endpoint, url = %url, ignored = ?classified.ignored, "constructed request");

        Ok(HttpRequest {
            endpoint: endpoint.to_string(),
            url,
            headers: Vec::new(),
        })
    }

    /// Check the status and validate the body of a response to `request`.
    pub fn parse_response(
        &self,
        request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<Payload, ApiError> {
        check_status(request, &response)?;
        validate_envelope(&request.url, &response.body).map_err(|err| match err {
            ApiError::MalformedResponse { url, message } => ApiError::MalformedResponse {
                url,
                message: match response.header("content-type") {
                    Some(content_type) => format!("{message} (content-type {content_type})"),
                    None => message,
                },
            },
            other => other,
        })
    }

    /// Build, send and parse in one step. Exactly one GET is issued; a
    /// failure is reported, never retried.
    pub fn call<T: Transport + ?Sized>(
        &self,
        transport: &T,
        endpoint: &str,
        args: &Value,
    ) -> Result<Payload, ApiError> {
        let request = self.build_request(endpoint, args)?;
        let response = transport.get(&request)?;
        self.parse_response(&request, response)
    }
}
