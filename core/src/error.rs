//! Error types for the stats API client.
//!
//! # Design
//! A call either succeeds with a validated payload or fails with exactly one
//! `ApiError`. Variants raised after the URL has been assembled carry that
//! URL so a failure can be diagnosed without repeating the request.

use thiserror::Error;

/// Errors returned by registry loading, request building and response parsing.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The endpoint name is not present in the registry.
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// The caller's arguments were not a JSON object.
    #[error("invalid arguments for {endpoint}: {reason}")]
    InvalidArguments { endpoint: String, reason: String },

    /// None of the endpoint's required-parameter groups is fully supplied.
    /// `groups` lists, per group, the members that were not supplied.
    #[error("{endpoint} is missing required parameters, supply one of {}", format_groups(.groups))]
    MissingRequiredParameters {
        endpoint: String,
        groups: Vec<Vec<String>>,
    },

    /// A required path parameter was omitted and declares no default.
    #[error("{endpoint} requires path parameter {parameter}")]
    MissingPathParameter { endpoint: String, parameter: String },

    /// Network-level failure reported by the transport.
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a status other than 200 or 201.
    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// The response body is not valid JSON.
    #[error("malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    /// The JSON payload is not a string-keyed mapping.
    #[error("unexpected response shape from {url}: {message}")]
    ResponseShape { url: String, message: String },

    /// The registry document is unreadable or violates a descriptor invariant.
    #[error("invalid registry: {0}")]
    InvalidRegistry(String),

    /// The configured base URL cannot be parsed.
    #[error("invalid base url {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },
}

fn format_groups(groups: &[Vec<String>]) -> String {
    let rendered: Vec<String> = groups
        .iter()
        .map(|group| format!("[{}]", group.join(", ")))
        .collect();
    rendered.join(" | ")
}
